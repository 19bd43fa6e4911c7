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
        entity::{LeaderboardRow, UserPoints},
        gamify,
    },
    web::{
        AppState, JsonBody, PathParam, QueryParams, RequestContext, WebError, WebResult,
        dto::points::{AwardPointsRequest, AwardPointsResponse, LeaderboardQuery, PointsResponse},
        error::ErrorResponse,
        middlewares,
    },
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/leaderboard", get(points_leaderboard_handler))
        .route("/{user_id}", get(points_get_handler).post(points_award_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/points/{user_id}",
    description = "Points and level of a user",
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Points found", body = PointsResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Not your points", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "points",
    security(
        ("cookie" = [])
    )
)]
pub async fn points_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    super::find_user_or_404(&state, user, user_id).await?;

    let points = UserPoints::find_by_user(state.pool(), user, user_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserPoints::get_resource_type(), e))?
        .unwrap_or_else(|| UserPoints::empty(user_id));

    check_access(state.pool(), user, &points, user.user_id())
        .await
        .map_err(|e| WebError::resource_access_error(UserPoints::get_resource_type(), e))?;

    let res = PointsResponse::new(&points, state.config().gamification().points_per_level());
    Ok((StatusCode::OK, Json(res)))
}

#[utoipa::path(
    post,
    path = "/api/v1/points/{user_id}",
    description = "Award points to a user (admin only). The level is recomputed and achievements are re-evaluated",
    request_body = AwardPointsRequest,
    params(
        ("user_id" = Uuid, Path, description = "ID of the user")
    ),
    responses(
        (status = 200, description = "Points awarded", body = AwardPointsResponse),
        (status = 400, description = "Amount out of range", body = ErrorResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Only admins can award points", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "points",
    security(
        ("cookie" = [])
    )
)]
pub async fn points_award_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    PathParam(user_id): PathParam<Uuid>,
    JsonBody(req): JsonBody<AwardPointsRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let rules = state.config().gamification();

    super::find_user_or_404(&state, user, user_id).await?;

    // manual awards are admin only
    if !user.is_admin() {
        return Err(WebError::resource_forbidden(UserPoints::get_resource_type()));
    }

    if !(1..=rules.max_award()).contains(&req.amount) {
        return Err(WebError::invalid_value(
            "amount",
            format!("must be within 1..={}", rules.max_award()),
        ));
    }

    let outcome = gamify::award_points(state.pool(), user_id, req.amount, rules)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserPoints::get_resource_type(), e))?;

    Ok((
        StatusCode::OK,
        Json(AwardPointsResponse::new(outcome, rules.points_per_level())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/points/leaderboard",
    description = "Users with the most points",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Leaderboard", body = Vec<LeaderboardRow>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "points",
    security(
        ("cookie" = [])
    )
)]
pub async fn points_leaderboard_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LeaderboardQuery>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let max = state.config().gamification().leaderboard_size();
    let limit = query.limit.unwrap_or(max).clamp(1, max.max(1));

    let rows = LeaderboardRow::top(state.pool(), user, limit)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserPoints::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(rows)))
}
