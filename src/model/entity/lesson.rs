use crate::model::repo::ResourceTyped;
use crate::model::{ModelManager, Page, error::DatabaseResult, repo::CrudRepository};
use crate::web::AuthenticatedUser;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

/// Lessons, guidelines and examples are all content pages, told apart by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LessonKind {
    Lesson,
    Guideline,
    Example,
}

impl LessonKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lesson => "lesson",
            Self::Guideline => "guideline",
            Self::Example => "example",
        }
    }
}

impl TryFrom<String> for LessonKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "lesson" => Ok(Self::Lesson),
            "guideline" => Ok(Self::Guideline),
            "example" => Ok(Self::Example),
            _ => Err(format!("unknown lesson kind `{value}`")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, utoipa::ToSchema)]
pub struct Lesson {
    id: Uuid,
    slug: String,
    title: String,
    description: String,
    content: String,
    #[sqlx(try_from = "String")]
    kind: LessonKind,
    points: i32,
    order_index: i32,
}

impl ResourceTyped for Lesson {
    fn get_resource_type() -> crate::model::ResourceType {
        crate::model::ResourceType::Lesson
    }
}

impl Lesson {
    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> LessonKind {
        self.kind
    }

    pub fn points(&self) -> i32 {
        self.points
    }

    pub fn order_index(&self) -> i32 {
        self.order_index
    }
}

#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LessonCreate {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub kind: LessonKind,
    pub points: Option<i32>,
    pub order_index: Option<i32>,
}

const DEFAULT_LESSON_POINTS: i32 = 10;

#[async_trait]
impl CrudRepository<Lesson, LessonCreate, uuid::Uuid> for Lesson {
    async fn create(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        let row = sqlx::query_as(
            r#"
            INSERT INTO lessons (id, slug, title, description, content, kind, points, order_index)
            VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&data.slug)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.content)
        .bind(data.kind.as_str())
        .bind(data.points.unwrap_or(DEFAULT_LESSON_POINTS))
        .bind(data.order_index.unwrap_or(0))
        .fetch_one(mm.executor())
        .await?;

        Ok(row)
    }

    async fn update(
        mut self,
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        data: LessonCreate,
    ) -> DatabaseResult<Self> {
        let points = data.points.unwrap_or(self.points);
        let order_index = data.order_index.unwrap_or(self.order_index);

        sqlx::query(
            r#"
            UPDATE lessons
            SET slug = $1, title = $2, description = $3, content = $4, kind = $5, points = $6, order_index = $7
            WHERE id = $8
            "#,
        )
        .bind(&data.slug)
        .bind(&data.title)
        .bind(&data.description)
        .bind(&data.content)
        .bind(data.kind.as_str())
        .bind(points)
        .bind(order_index)
        .bind(self.id)
        .execute(mm.executor())
        .await?;

        self.slug = data.slug;
        self.title = data.title;
        self.description = data.description;
        self.content = data.content;
        self.kind = data.kind;
        self.points = points;
        self.order_index = order_index;
        Ok(self)
    }

    async fn delete(self, mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM lessons WHERE id = $1")
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
        let result = sqlx::query_as("SELECT * FROM lessons ORDER BY order_index, title LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(mm.executor())
            .await?;
        Ok(result)
    }

    async fn count(mm: &ModelManager, _actor: &AuthenticatedUser) -> DatabaseResult<i64> {
        let result: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons")
            .fetch_one(mm.executor())
            .await?;

        Ok(result)
    }
}

impl Lesson {
    pub async fn find_by_slug(
        mm: &ModelManager,
        _actor: &AuthenticatedUser,
        slug: &str,
    ) -> DatabaseResult<Option<Self>> {
        let result = sqlx::query_as("SELECT * FROM lessons WHERE slug = $1")
            .bind(slug)
            .fetch_optional(mm.executor())
            .await?;
        Ok(result)
    }

    /// Content pages are addressable by id as well as by slug.
    pub async fn find_by_id_or_slug(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        key: &str,
    ) -> DatabaseResult<Option<Self>> {
        match key.parse::<Uuid>() {
            Ok(id) => Self::find_by_id(mm, actor, id).await,
            Err(_) => Self::find_by_slug(mm, actor, key).await,
        }
    }

    pub async fn page_by_kind(
        mm: &ModelManager,
        actor: &AuthenticatedUser,
        kind: Option<LessonKind>,
        limit: i64,
        offset: i64,
    ) -> DatabaseResult<Page<Self>> {
        let Some(kind) = kind else {
            let items = Self::list(mm, actor, limit, offset).await?;
            let total = Self::count(mm, actor).await?;
            return Ok(Page::new(items, total, limit, offset));
        };

        let items = sqlx::query_as(
            "SELECT * FROM lessons WHERE kind = $1 ORDER BY order_index, title LIMIT $2 OFFSET $3",
        )
        .bind(kind.as_str())
        .bind(limit)
        .bind(offset)
        .fetch_all(mm.executor())
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM lessons WHERE kind = $1")
            .bind(kind.as_str())
            .fetch_one(mm.executor())
            .await?;

        Ok(Page::new(items, total, limit, offset))
    }
}

// Utils

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LessonWithStatusRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub kind: LessonKind,
    pub points: i32,
    pub completed: bool,
}

impl LessonWithStatusRow {
    /// `user_id` is `None` for anonymous readers, everything reads as not completed then.
    pub async fn find_by_id(
        mm: &ModelManager,
        user_id: Option<Uuid>,
        lesson_id: Uuid,
    ) -> DatabaseResult<Option<Self>> {
        let row = sqlx::query_as(
            r#"
            SELECT
                l.id,
                l.slug,
                l.title,
                l.description,
                l.content,
                l.kind,
                l.points,
                (up.id IS NOT NULL) AS completed
            FROM lessons l
            LEFT JOIN user_progress up
                ON l.id = up.lesson_id AND up.user_id = $2
            WHERE l.id = $1
            "#
        )
        .bind(lesson_id)
        .bind(user_id)
        .fetch_optional(mm.executor())
        .await?;

        Ok(row)
    }
}
