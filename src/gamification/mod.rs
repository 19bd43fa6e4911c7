//! Pure gamification rules: levels, streaks and achievement thresholds.
//!
//! Nothing in here touches the database, the transactional flows in
//! [`crate::model::gamify`] feed these rules with locked rows.

mod level;
pub use level::{level_for_points, points_to_next_level};

mod streak;
pub use streak::{Streak, StreakChange};

mod achievement;
pub use achievement::{AchievementKind, ProgressStats, is_earned};
