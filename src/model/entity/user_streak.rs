use crate::gamification::Streak;
use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserStreak {
    user_id: Uuid,
    current_streak: i32,
    longest_streak: i32,
    last_activity_date: Option<NaiveDate>,
    updated_at: DateTime<Utc>,
}

impl ResourceTyped for UserStreak {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UserStreak
    }
}

impl UserStreak {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            current_streak: 0,
            longest_streak: 0,
            last_activity_date: None,
            updated_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn current_streak(&self) -> i32 {
        self.current_streak
    }

    pub fn longest_streak(&self) -> i32 {
        self.longest_streak
    }

    pub fn last_activity_date(&self) -> Option<NaiveDate> {
        self.last_activity_date
    }

    pub fn as_streak(&self) -> Streak {
        Streak::new(self.current_streak, self.longest_streak, self.last_activity_date)
    }

    pub async fn find_by_user(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM user_streaks WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    /// Creates the row if needed and locks it until the transaction ends.
    pub async fn lock_in(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<Self> {
        sqlx::query("INSERT INTO user_streaks (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let row = sqlx::query_as("SELECT * FROM user_streaks WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    pub async fn store_in(
        conn: &mut PgConnection,
        user_id: Uuid,
        streak: &Streak,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            UPDATE user_streaks
            SET current_streak = $1, longest_streak = $2, last_activity_date = $3, updated_at = now()
            WHERE user_id = $4
            RETURNING *
            "#,
        )
        .bind(streak.current)
        .bind(streak.longest)
        .bind(streak.last_activity)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    pub async fn longest_in(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<i64> {
        let longest: Option<i32> =
            sqlx::query_scalar("SELECT longest_streak FROM user_streaks WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(longest.map(i64::from).unwrap_or(0))
    }
}

#[async_trait]
impl HasOwner for UserStreak {
    type OwnerId = uuid::Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.user_id)
    }
}
