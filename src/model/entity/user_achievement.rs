use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

use crate::model::{ResourceTyped, error::DatabaseResult};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserAchievement {
    id: Uuid,
    user_id: Uuid,
    achievement_id: Uuid,
    unlocked_at: DateTime<Utc>,
}

impl ResourceTyped for UserAchievement {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UserAchievement
    }
}

impl UserAchievement {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn achievement_id(&self) -> Uuid {
        self.achievement_id
    }

    pub fn unlocked_at(&self) -> &DateTime<Utc> {
        &self.unlocked_at
    }

    /// `None` when the user already had it.
    pub async fn unlock_in(
        conn: &mut PgConnection,
        user_id: Uuid,
        achievement_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_achievements (id, user_id, achievement_id)
            VALUES ($1,$2,$3)
            ON CONFLICT (user_id, achievement_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(achievement_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }
}
