use crate::gamification::AchievementKind;
use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Achievement {
    id: Uuid,
    code: String,
    title: String,
    description: String,
    #[sqlx(try_from = "String")]
    kind: AchievementKind,
    threshold: i64,
    icon: String,
}

impl ResourceTyped for Achievement {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Achievement
    }
}

impl Achievement {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn kind(&self) -> AchievementKind {
        self.kind
    }

    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AchievementCreate {
    pub code: String,
    pub title: String,
    pub description: String,
    pub kind: AchievementKind,
    pub threshold: i64,
    pub icon: String,
}

#[async_trait]
impl CrudRepository<Achievement, AchievementCreate, uuid::Uuid> for Achievement {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AchievementCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO achievements (id, code, title, description, kind, threshold, icon)
            VALUES ($1,$2,$3,$4,$5,$6,$7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.code)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.kind.as_str())
        .bind(data.threshold)
        .bind(&data.icon)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: AchievementCreate,
    ) -> DatabaseResult<Self> {
        sqlx::query(
            r#"
            UPDATE achievements
            SET code = $1, title = $2, description = $3, kind = $4, threshold = $5, icon = $6
            WHERE id = $7
            "#,
        )
        .bind(&data.code)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.kind.as_str())
        .bind(data.threshold)
        .bind(&data.icon)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.code = data.code;
        self.title = data.title;
        self.description = data.description;
        self.kind = data.kind;
        self.threshold = data.threshold;
        self.icon = data.icon;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM achievements WHERE id = $1")
            .bind(self.id)
            .execute(mm.executor())
            .await?;
        Ok(())
    }

    async fn find_by_id(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        id: uuid::Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM achievements WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    async fn list(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as("SELECT * FROM achievements ORDER BY kind, threshold LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM achievements")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Achievement {
    pub async fn find_by_code(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        code: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM achievements WHERE code = $1")
            .bind(code)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    /// Achievements the user hasn't unlocked yet.
    pub async fn locked_for_in(conn: &mut PgConnection, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT a.*
            FROM achievements a
            WHERE NOT EXISTS (
                SELECT 1 FROM user_achievements ua
                WHERE ua.achievement_id = a.id AND ua.user_id = $1
            )
            ORDER BY a.kind, a.threshold
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(rows)
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct AchievementWithStatusRow {
    pub id: Uuid,
    pub code: String,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub kind: AchievementKind,
    pub threshold: i64,
    pub icon: String,
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementWithStatusRow {
    pub async fn all_for_user(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                a.id,
                a.code,
                a.title,
                a.description,
                a.kind,
                a.threshold,
                a.icon,
                ua.unlocked_at
            FROM achievements a
            LEFT JOIN user_achievements ua
                ON ua.achievement_id = a.id AND ua.user_id = $1
            ORDER BY a.kind, a.threshold
            "#,
        )
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;
        Ok(rows)
    }
}
