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
    model::{
        ResourceTyped, check_access,
        entity::{Achievement, AchievementWithStatusRow, UserAchievement},
        gamify,
    },
    web::{
        AppState, PathParam, RequestContext, WebError, WebResult,
        dto::achievements::{AchievementStatus, UnlockResponse},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/{user_id}", get(achievements_get_handler).post(achievements_unlock_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/achievements/{user_id}",
    description = "All achievements with the user's unlock state",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Achievements", body = Vec<AchievementStatus>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Not your achievements", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "achievements",
    security(
        ("cookie" = [])
    )
)]
pub async fn achievements_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let target = super::find_user_or_404(&state, user, user_id).await?;
    check_access(state.pool(), user, &target, user.user_id())
        .await
        .map_err(|e| WebError::resource_access_error(UserAchievement::get_resource_type(), e))?;

    let rows = AchievementWithStatusRow::all_for_user(state.pool(), user_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Achievement::get_resource_type(), e))?;

    let res: Vec<AchievementStatus> = rows.into_iter().map(AchievementStatus::from).collect();
    Ok((StatusCode::OK, Json(res)))
}

#[utoipa::path(
    post,
    path = "/api/v1/achievements/{user_id}",
    description = "Evaluate the user's counters and unlock every achievement they qualify for",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Newly unlocked achievements", body = UnlockResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Not your achievements", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "achievements",
    security(
        ("cookie" = [])
    )
)]
pub async fn achievements_unlock_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let target = super::find_user_or_404(&state, user, user_id).await?;
    check_access(state.pool(), user, &target, user.user_id())
        .await
        .map_err(|e| WebError::resource_access_error(UserAchievement::get_resource_type(), e))?;

    let unlocked = gamify::unlock_earned(state.pool(), user_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserAchievement::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(UnlockResponse { unlocked })))
}
