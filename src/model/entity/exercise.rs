use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(format!("unknown difficulty `{value}`")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Exercise {
    id: Uuid,
    lesson_id: Uuid,
    title: String,
    prompt: String,
    hint: String,
    #[sqlx(try_from = "String")]
    difficulty: Difficulty,
    points: i32,
    order_index: i32,
}

impl ResourceTyped for Exercise {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Exercise
    }
}

impl Exercise {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn lesson_id(&self) -> Uuid {
        self.lesson_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ExerciseCreate {
    pub lesson_id: Uuid,
    pub title: String,
    pub prompt: String,
    pub hint: String,
    pub difficulty: Difficulty,
    pub points: Option<i32>,
    pub order_index: Option<i32>,
}

impl Difficulty {
    /// Reward used when an exercise is created without explicit points.
    pub fn default_points(&self) -> i32 {
        match self {
            Self::Easy => 20,
            Self::Medium => 35,
            Self::Hard => 50,
        }
    }
}

#[async_trait]
impl CrudRepository<Exercise, ExerciseCreate, uuid::Uuid> for Exercise {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ExerciseCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO exercises (id, lesson_id, title, prompt, hint, difficulty, points, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.lesson_id)
        .bind(&data.title)
        .bind(&data.prompt)
        .bind(&data.hint)
        .bind(data.difficulty.as_str())
        .bind(data.points.unwrap_or(data.difficulty.default_points()))
        .bind(data.order_index.unwrap_or(0))
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: ExerciseCreate,
    ) -> DatabaseResult<Self> {
        let points = data.points.unwrap_or(self.points);
        let order_index = data.order_index.unwrap_or(self.order_index);

        sqlx::query(
            r#"
            UPDATE exercises
            SET lesson_id = $1, title = $2, prompt = $3, hint = $4, difficulty = $5, points = $6, order_index = $7
            WHERE id = $8
            "#,
        )
        .bind(data.lesson_id)
        .bind(&data.title)
        .bind(&data.prompt)
        .bind(&data.hint)
        .bind(data.difficulty.as_str())
        .bind(points)
        .bind(order_index)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.lesson_id = data.lesson_id;
        self.title = data.title;
        self.prompt = data.prompt;
        self.hint = data.hint;
        self.difficulty = data.difficulty;
        self.points = points;
        self.order_index = order_index;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM exercises WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM exercises WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM exercises ORDER BY lesson_id, order_index LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exercises")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExerciseWithStatusRow {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub title: String,
    pub prompt: String,
    pub hint: String,
    #[sqlx(try_from = "String")]
    pub difficulty: Difficulty,
    pub points: i32,
    pub completed: bool,
}

impl ExerciseWithStatusRow {
    pub async fn find_by_id(
        mm: &ModelManager,
        user_id: Option<Uuid>,
        exercise_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(
            r#"
            SELECT
                e.id,
                e.lesson_id,
                e.title,
                e.prompt,
                e.hint,
                e.difficulty,
                e.points,
                (up.id IS NOT NULL) AS completed
            FROM exercises e
            LEFT JOIN user_progress up
                ON e.id = up.exercise_id AND up.user_id = $2
            WHERE e.id = $1
            "#,
        )
        .bind(exercise_id)
        .bind(user_id)
        .fetch_optional(mm.executor())
        .await?;

        Ok(row)
    }

    pub async fn all_by_lesson(
        mm: &ModelManager,
        user_id: Option<Uuid>,
        lesson_id: Uuid,
    ) -> DatabaseResult<Vec<Self>> {
        let rows = sqlx::query_as(
            r#"
            SELECT
                e.id,
                e.lesson_id,
                e.title,
                e.prompt,
                e.hint,
                e.difficulty,
                e.points,
                (up.id IS NOT NULL) AS completed
            FROM exercises e
            LEFT JOIN user_progress up
                ON e.id = up.exercise_id AND up.user_id = $2
            WHERE e.lesson_id = $1
            ORDER BY e.order_index ASC
            "#,
        )
        .bind(lesson_id)
        .bind(user_id)
        .fetch_all(mm.executor())
        .await?;

        Ok(rows)
    }
}
