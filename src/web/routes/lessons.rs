use axum::Json;
use axum::{extract::State, middleware, response::IntoResponse, routing::get, Router};
use axum::http::StatusCode;

use crate::model::entity::{ExerciseWithStatusRow, Exercise, Lesson, LessonWithStatusRow};
use crate::model::{Page, ResourceTyped};
use crate::web::dto::lessons::{LessonResponse, LessonsQuery};
use crate::web::error::ErrorResponse;
use crate::web::{middlewares, AppState, AuthenticatedUser, PathParam, QueryParams, RequestContext, WebError, WebResult};

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(lessons_list_handler))
        .route("/{key}", get(lessons_get_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

const MAX_PAGE_SIZE: i64 = 100;

#[utoipa::path(
    get,
    path = "/api/v1/lessons",
    description = "List content pages (lessons, guidelines, examples), optionally filtered by kind",
    params(LessonsQuery),
    responses(
        (status = 200, description = "Page of content", body = Page<Lesson>),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lessons_list_handler(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LessonsQuery>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    if !(1..=MAX_PAGE_SIZE).contains(&query.limit) {
        return Err(WebError::invalid_value("limit", format!("must be within 1..={MAX_PAGE_SIZE}")));
    }
    if query.offset < 0 {
        return Err(WebError::invalid_value("offset", "must not be negative"));
    }

    let guest = AuthenticatedUser::guest();
    let actor = ctx.maybe_user().unwrap_or(&guest);

    let page = Lesson::page_by_kind(state.pool(), actor, query.kind, query.limit, query.offset)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?;

    Ok((StatusCode::OK, Json(page)))
}

#[utoipa::path(
    get,
    path = "/api/v1/lessons/{key}",
    description = "Fetch a content page with its exercises. Completion flags refer to the signed in user",
    params(
        ("key" = String, Path, description = "ID or slug of the lesson to get")
    ),
    responses(
        (status = 200, description = "Lesson found", body = LessonResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "lessons"
)]
pub async fn lessons_get_handler(
    State(state): State<AppState>,
    PathParam(key): PathParam<String>,
    ctx: RequestContext,
) -> WebResult<impl IntoResponse> {
    let user_id = ctx.maybe_user_id();
    let guest = AuthenticatedUser::guest();
    let actor = ctx.maybe_user().unwrap_or(&guest);

    let lesson = Lesson::find_by_id_or_slug(state.pool(), actor, &key)
        .await
        .map_err(|e| WebError::resource_fetch_error(Lesson::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(Lesson::get_resource_type()))?;

    let (row, exercises) = tokio::try_join!(
        LessonWithStatusRow::find_by_id(state.pool(), user_id, lesson.id()),
        ExerciseWithStatusRow::all_by_lesson(state.pool(), user_id, lesson.id()),
    )
    .map_err(|e| WebError::resource_fetch_error(Exercise::get_resource_type(), e))?;

    // deleted between the two queries
    let row = row.ok_or(WebError::resource_not_found(Lesson::get_resource_type()))?;

    Ok((StatusCode::OK, Json(LessonResponse::from_rows(row, exercises))))
}
