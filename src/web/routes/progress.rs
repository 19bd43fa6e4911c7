use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::{
    model::{
        CrudRepository, ResourceTyped,
        entity::{ContentRef, Exercise, Lesson, UserPoints, UserProgress, UserStreak},
        gamify,
    },
    web::{
        AppState, JsonBody, RequestContext, WebError, WebResult,
        dto::progress::{CompleteContentRequest, CompleteContentResponse, UserProgressResponse},
        error::ErrorResponse,
        middlewares,
    },
};

const RECENT_ENTRIES: i64 = 50;

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(progress_get_handler).post(progress_complete_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/progress",
    description = "Get current user's progress",
    responses(
        (status = 200, description = "Progress found", body = UserProgressResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("cookie" = [])
    )
)]
pub async fn progress_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let mm = state.pool();

    let (total_lessons, total_exercises, completed, entries, points, streak) = tokio::try_join!(
        Lesson::count(mm, user),
        Exercise::count(mm, user),
        UserProgress::count_completed(mm, user.user_id()),
        UserProgress::list(mm, user, RECENT_ENTRIES, 0),
        UserPoints::find_by_user(mm, user, user.user_id()),
        UserStreak::find_by_user(mm, user, user.user_id()),
    )
    .map_err(|e| WebError::resource_fetch_error(UserProgress::get_resource_type(), e))?;

    let (completed_lessons, completed_exercises) = completed;
    let points = points.unwrap_or_else(|| UserPoints::empty(user.user_id()));
    let streak = streak.unwrap_or_else(|| UserStreak::empty(user.user_id()));

    let res = UserProgressResponse {
        total_lessons,
        completed_lessons,
        total_exercises,
        completed_exercises,
        points: points.points(),
        level: points.level(),
        current_streak: streak.current_streak(),
        entries,
    };

    Ok((StatusCode::OK, Json(res)))
}

#[utoipa::path(
    post,
    path = "/api/v1/progress",
    description = "Mark a lesson or an exercise as completed. Awards its points once, counts as today's activity",
    request_body = CompleteContentRequest,
    responses(
        (status = 200, description = "Completion recorded", body = CompleteContentResponse),
        (status = 400, description = "Neither or both targets given", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 404, description = "Lesson or exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("cookie" = [])
    )
)]
pub async fn progress_complete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CompleteContentRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let content = req.content()?;

    let reward = match content {
        ContentRef::Lesson(id) => Lesson::find_by_id(state.pool(), user, id)
            .await
            .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
            .map(|lesson| lesson.points())
            .ok_or(WebError::resource_not_found(Lesson::get_resource_type()))?,
        ContentRef::Exercise(id) => Exercise::find_by_id(state.pool(), user, id)
            .await
            .map_err(|e| WebError::resource_fetch_error(Exercise::get_resource_type(), e))?
            .map(|exercise| exercise.points())
            .ok_or(WebError::resource_not_found(Exercise::get_resource_type()))?,
    };

    let today = chrono::Utc::now().date_naive();
    let outcome = gamify::complete_content(
        state.pool(),
        user.user_id(),
        content,
        reward,
        state.config().gamification(),
        today,
    )
    .await
    .map_err(|e| WebError::resource_fetch_error(UserProgress::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(CompleteContentResponse::from(outcome))))
}
