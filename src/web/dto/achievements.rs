use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    gamification::AchievementKind,
    model::entity::{Achievement, AchievementWithStatusRow},
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AchievementStatus {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: String,
    pub kind: AchievementKind,
    pub threshold: i64,
    pub icon: String,
    pub unlocked: bool,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl From<AchievementWithStatusRow> for AchievementStatus {
    fn from(row: AchievementWithStatusRow) -> Self {
        Self {
            id: row.id,
            code: row.code,
            title: row.title,
            description: row.description,
            kind: row.kind,
            threshold: row.threshold,
            icon: row.icon,
            unlocked: row.unlocked_at.is_some(),
            unlocked_at: row.unlocked_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnlockResponse {
    pub unlocked: Vec<Achievement>,
}
