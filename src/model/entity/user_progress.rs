use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct UserProgress {
    id: Uuid,
    user_id: Uuid,
    lesson_id: Option<Uuid>,
    exercise_id: Option<Uuid>,
    points_awarded: i32,
    completed_at: DateTime<Utc>,
}

/// A completable piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRef {
    Lesson(Uuid),
    Exercise(Uuid),
}

impl ContentRef {
    fn columns(&self) -> (Option<Uuid>, Option<Uuid>) {
        match *self {
            Self::Lesson(id) => (Some(id), None),
            Self::Exercise(id) => (None, Some(id)),
        }
    }
}

impl ResourceTyped for UserProgress {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::UserProgress
    }
}

impl UserProgress {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn lesson_id(&self) -> Option<Uuid> {
        self.lesson_id
    }

    pub fn exercise_id(&self) -> Option<Uuid> {
        self.exercise_id
    }

    pub fn points_awarded(&self) -> i32 {
        self.points_awarded
    }

    pub fn completed_at(&self) -> &DateTime<Utc> {
        &self.completed_at
    }
}

pub struct UserProgressCreate {
    pub user_id: Uuid,
    pub content: ContentRef,
    pub points_awarded: i32,
}

impl UserProgressCreate {
    pub fn new(user_id: Uuid, content: ContentRef, points_awarded: i32) -> Self {
        Self {
            user_id,
            content,
            points_awarded,
        }
    }
}

#[async_trait]
impl CrudRepository<UserProgress, UserProgressCreate, uuid::Uuid> for UserProgress {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserProgressCreate,
    ) -> DatabaseResult<Self> {
        let (lesson_id, exercise_id) = data.content.columns();
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_progress (id, user_id, lesson_id, exercise_id, points_awarded)
            VALUES ($1,$2,$3,$4,$5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(lesson_id)
        .bind(exercise_id)
        .bind(data.points_awarded)
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: UserProgressCreate,
    ) -> DatabaseResult<Self> {
        let (lesson_id, exercise_id) = data.content.columns();
        sqlx::query(
            "UPDATE user_progress SET user_id = $1, lesson_id = $2, exercise_id = $3, points_awarded = $4 WHERE id = $5",
        )
        .bind(data.user_id)
        .bind(lesson_id)
        .bind(exercise_id)
        .bind(data.points_awarded)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.user_id = data.user_id;
        self.lesson_id = lesson_id;
        self.exercise_id = exercise_id;
        self.points_awarded = data.points_awarded;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM user_progress WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM user_progress WHERE id = $1")
            .bind(id)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    /// Lists the actor's own progress, newest first.
    async fn list(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Vec<Self>> {
        let result = sqlx::query_as(
            "SELECT * FROM user_progress WHERE user_id = $1 ORDER BY completed_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(actor.user_id())
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_progress WHERE user_id = $1")
            .bind(actor.user_id())
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl UserProgress {
    /// Inserts the completion unless it already exists. `None` means the
    /// content was completed before.
    pub async fn insert_if_absent_in(
        conn: &mut PgConnection,
        data: &UserProgressCreate,
    ) -> DatabaseResult<Option<Self>> {
        let (lesson_id, exercise_id) = data.content.columns();
        let row = sqlx::query_as(
            r#"
            INSERT INTO user_progress (id, user_id, lesson_id, exercise_id, points_awarded)
            VALUES ($1,$2,$3,$4,$5)
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(lesson_id)
        .bind(exercise_id)
        .bind(data.points_awarded)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row)
    }

    /// (completed lessons, completed exercises)
    pub async fn count_completed_in(
        conn: &mut PgConnection,
        user_id: Uuid,
    ) -> DatabaseResult<(i64, i64)> {
        let counts: (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(lesson_id) AS lessons,
                COUNT(exercise_id) AS exercises
            FROM user_progress
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        Ok(counts)
    }

    pub async fn count_completed(mm: &ModelManager, user_id: Uuid) -> DatabaseResult<(i64, i64)> {
        let mut conn = mm.executor().acquire().await?;
        Self::count_completed_in(&mut *conn, user_id).await
    }
}
