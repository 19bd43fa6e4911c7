use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    gamification::StreakChange,
    model::{
        entity::{Achievement, ContentRef, UserProgress},
        gamify::CompletionOutcome,
    },
    web::{WebError, WebResult},
};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserProgressResponse {
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub total_exercises: i64,
    pub completed_exercises: i64,
    pub points: i64,
    pub level: i32,
    pub current_streak: i32,
    pub entries: Vec<UserProgress>,
}

/// Exactly one of the ids has to be set.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CompleteContentRequest {
    pub lesson_id: Option<Uuid>,
    pub exercise_id: Option<Uuid>,
}

impl CompleteContentRequest {
    pub fn content(&self) -> WebResult<ContentRef> {
        match (self.lesson_id, self.exercise_id) {
            (Some(id), None) => Ok(ContentRef::Lesson(id)),
            (None, Some(id)) => Ok(ContentRef::Exercise(id)),
            _ => Err(WebError::invalid_value(
                "lesson_id",
                "exactly one of `lesson_id` and `exercise_id` must be set",
            )),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CompleteContentResponse {
    /// False when the content had been completed before.
    pub newly_completed: bool,
    pub points_awarded: i32,
    pub points: i64,
    pub level: i32,
    pub leveled_up: bool,
    pub current_streak: i32,
    pub streak_change: StreakChange,
    pub unlocked: Vec<Achievement>,
}

impl From<CompletionOutcome> for CompleteContentResponse {
    fn from(outcome: CompletionOutcome) -> Self {
        Self {
            newly_completed: outcome.progress.is_some(),
            points_awarded: outcome
                .progress
                .as_ref()
                .map(UserProgress::points_awarded)
                .unwrap_or(0),
            points: outcome.points.points(),
            level: outcome.points.level(),
            leveled_up: outcome.points.level() > outcome.previous_level,
            current_streak: outcome.streak.current_streak(),
            streak_change: outcome.streak_change,
            unlocked: outcome.unlocked,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exactly_one_target() {
        let id = Uuid::new_v4();
        let lesson = CompleteContentRequest { lesson_id: Some(id), exercise_id: None };
        assert_eq!(lesson.content().unwrap(), ContentRef::Lesson(id));

        let exercise = CompleteContentRequest { lesson_id: None, exercise_id: Some(id) };
        assert_eq!(exercise.content().unwrap(), ContentRef::Exercise(id));

        let both = CompleteContentRequest { lesson_id: Some(id), exercise_id: Some(id) };
        assert!(both.content().is_err());

        let neither = CompleteContentRequest { lesson_id: None, exercise_id: None };
        assert!(neither.content().is_err());
    }
}
