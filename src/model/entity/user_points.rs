use crate::model::access::HasOwner;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Points counter of one user. A missing row reads as zero points, level 1.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserPoints {
    user_id: Uuid,
    points: i64,
    level: i32,
    updated_at: DateTime<Utc>,
}

impl ResourceTyped for UserPoints {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UserPoints
    }
}

impl UserPoints {
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            points: 0,
            level: 1,
            updated_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn points(&self) -> i64 {
        self.points
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn updated_at(&self) -> &DateTime<Utc> {
        &self.updated_at
    }

    pub async fn find_by_user(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        user_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM user_points WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    /// Creates the row if needed and locks it until the transaction ends.
    pub async fn lock_in(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<Self> {
        sqlx::query("INSERT INTO user_points (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&mut *conn)
            .await?;

        let row = sqlx::query_as("SELECT * FROM user_points WHERE user_id = $1 FOR UPDATE")
            .bind(user_id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(row)
    }

    pub async fn store_in(
        conn: &mut PgConnection,
        user_id: Uuid,
        points: i64,
        level: i32,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            UPDATE user_points
            SET points = $1, level = $2, updated_at = now()
            WHERE user_id = $3
            RETURNING *
            "#,
        )
        .bind(points)
        .bind(level)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(row)
    }

    pub async fn points_in(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<i64> {
        let points: Option<i64> = sqlx::query_scalar("SELECT points FROM user_points WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(points.unwrap_or(0))
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct LeaderboardRow {
    pub user_id: Uuid,
    pub username: String,
    pub points: i64,
    pub level: i32,
}

impl LeaderboardRow {
    pub async fn top(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT u.id AS user_id, u.username, p.points, p.level
            FROM user_points p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.points DESC, u.username ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }
}

#[async_trait]
impl HasOwner for UserPoints {
    type OwnerId = uuid::Uuid;

    async fn get_owner_id(
        &self,
        _mm: &ModelManager,
        _actor: &AuthenticatedUser,
    ) -> DatabaseResult<Self::OwnerId> {
        Ok(self.user_id)
    }
}
