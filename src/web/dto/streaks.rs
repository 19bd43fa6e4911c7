use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    gamification::StreakChange,
    model::{
        entity::{Achievement, UserStreak},
        gamify::ActivityOutcome,
    },
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StreakResponse {
    pub user_id: Uuid,
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_activity_date: Option<NaiveDate>,
    /// Whether the streak can still be extended (activity today or yesterday).
    pub is_active: bool,
}

impl StreakResponse {
    pub fn new(streak: &UserStreak, today: NaiveDate) -> Self {
        Self {
            user_id: streak.user_id(),
            current_streak: streak.current_streak(),
            longest_streak: streak.longest_streak(),
            last_activity_date: streak.last_activity_date(),
            is_active: streak.as_streak().is_active(today),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RecordActivityResponse {
    #[serde(flatten)]
    pub streak: StreakResponse,
    pub change: StreakChange,
    pub unlocked: Vec<Achievement>,
}

impl RecordActivityResponse {
    pub fn new(outcome: ActivityOutcome, today: NaiveDate) -> Self {
        Self {
            streak: StreakResponse::new(&outcome.streak, today),
            change: outcome.change,
            unlocked: outcome.unlocked,
        }
    }
}
