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
    model::{ResourceTyped, entity::{Exercise, ExerciseWithStatusRow}},
    web::{
        AppState, PathParam, RequestContext, WebError, WebResult, dto::lessons::ExerciseResponse,
        error::ErrorResponse, middlewares,
    },
};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/{id}", get(exercises_get_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/exercises/{id}",
    description = "Fetch one exercise. The completion flag refers to the signed in user",
    params(
        ("id" = Uuid, Path, description = "ID of the exercise to get")
    ),
    responses(
        (status = 200, description = "Exercise found", body = ExerciseResponse),
        (status = 404, description = "Exercise not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "exercises"
)]
pub async fn exercises_get_handler(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let exercise = ExerciseWithStatusRow::find_by_id(state.pool(), ctx.maybe_user_id(), id)
        .await
        .map_err(|e| WebError::resource_fetch_error(Exercise::get_resource_type(), e))?
        .map(ExerciseResponse::from)
        .ok_or(WebError::resource_not_found(Exercise::get_resource_type()))?;

    Ok((StatusCode::OK, Json(exercise)))
}
