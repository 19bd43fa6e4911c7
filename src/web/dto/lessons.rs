use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entity::{Difficulty, ExerciseWithStatusRow, LessonKind, LessonWithStatusRow};

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
pub struct LessonsQuery {
    pub kind: Option<LessonKind>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub title: String,
    pub prompt: String,
    pub hint: String,
    pub difficulty: Difficulty,
    pub points: i32,
    pub completed: bool,
}

impl From<ExerciseWithStatusRow> for ExerciseResponse {
    fn from(row: ExerciseWithStatusRow) -> Self {
        Self {
            id: row.id,
            lesson_id: row.lesson_id,
            title: row.title,
            prompt: row.prompt,
            hint: row.hint,
            difficulty: row.difficulty,
            points: row.points,
            completed: row.completed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LessonResponse {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub kind: LessonKind,
    pub points: i32,
    pub completed: bool,
    pub exercises: Vec<ExerciseResponse>,
}

impl LessonResponse {
    pub fn from_rows(row: LessonWithStatusRow, exercises: Vec<ExerciseWithStatusRow>) -> Self {
        Self {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            content: row.content,
            kind: row.kind,
            points: row.points,
            completed: row.completed,
            exercises: exercises.into_iter().map(ExerciseResponse::from).collect(),
        }
    }
}
