use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    model::{ResourceTyped, check_access, entity::UserStreak, gamify},
    web::{
        AppState, PathParam, RequestContext, WebError, WebResult,
        dto::streaks::{RecordActivityResponse, StreakResponse},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/{user_id}", get(streaks_get_handler).post(streaks_record_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/streaks/{user_id}",
    description = "Activity streak of a user",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Streak found", body = StreakResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Not your streak", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "streaks",
    security(
        ("cookie" = [])
    )
)]
pub async fn streaks_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    super::find_user_or_404(&state, user, user_id).await?;

    let streak = UserStreak::find_by_user(state.pool(), user, user_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserStreak::get_resource_type(), e))?
        .unwrap_or_else(|| UserStreak::empty(user_id));

    check_access(state.pool(), user, &streak, user.user_id())
        .await
        .map_err(|e| WebError::resource_access_error(UserStreak::get_resource_type(), e))?;

    let today = chrono::Utc::now().date_naive();
    Ok((StatusCode::OK, Json(StreakResponse::new(&streak, today))))
}

#[utoipa::path(
    post,
    path = "/api/v1/streaks/{user_id}",
    description = "Record today's activity. Extends the streak after yesterday's activity, resets it after a gap",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Activity recorded", body = RecordActivityResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Not your streak", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "streaks",
    security(
        ("cookie" = [])
    )
)]
pub async fn streaks_record_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    super::find_user_or_404(&state, user, user_id).await?;
    check_access(state.pool(), user, &UserStreak::empty(user_id), user.user_id())
        .await
        .map_err(|e| WebError::resource_access_error(UserStreak::get_resource_type(), e))?;

    let today = chrono::Utc::now().date_naive();
    let outcome = gamify::record_activity(state.pool(), user_id, today)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserStreak::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(RecordActivityResponse::new(outcome, today))))
}
