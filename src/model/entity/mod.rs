mod user;
pub use user::{UserEntity, UserEntityCreateUpdate};

mod lesson;
pub use lesson::{Lesson, LessonCreate, LessonKind, LessonWithStatusRow};

mod exercise;
pub use exercise::{Difficulty, Exercise, ExerciseCreate, ExerciseWithStatusRow};

mod user_progress;
pub use user_progress::{ContentRef, UserProgress, UserProgressCreate};

mod user_points;
pub use user_points::{LeaderboardRow, UserPoints};

mod user_streak;
pub use user_streak::UserStreak;

mod achievement;
pub use achievement::{Achievement, AchievementCreate, AchievementWithStatusRow};

mod user_achievement;
pub use user_achievement::UserAchievement;
