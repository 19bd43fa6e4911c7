use crate::{
    model::{CrudRepository, ResourceTyped, entity::UserEntity},
    web::{doc::ApiDoc, middlewares, AppState, AuthenticatedUser, WebError, WebResult},
};
use axum::{Router, middleware};
use serde::Deserialize;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

pub mod achievements;
pub mod exercises;
pub mod lessons;
pub mod points;
pub mod progress;
pub mod streaks;
pub mod user;

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
pub struct PaginationQuery {
    limit: i64,
    offset: i64,
}

pub fn build_app(state: AppState) -> Router {
    let mut router = Router::new()
        .nest("/api/v1/account", user::routes(state.clone()))
        .nest("/api/v1/lessons", lessons::routes(state.clone()))
        .nest("/api/v1/exercises", exercises::routes(state.clone()))
        .nest("/api/v1/progress", progress::routes(state.clone()))
        .nest("/api/v1/points", points::routes(state.clone()))
        .nest("/api/v1/streaks", streaks::routes(state.clone()))
        .nest("/api/v1/achievements", achievements::routes(state.clone()));

    if state.config().app().docs() {
        let openapi = ApiDoc::openapi();

        router = router
            .merge(
                SwaggerUi::new("/api/v1/docs")
                    .url("/api-doc/openapi.json", openapi),
            );
    }

    router
        .layer(middleware::from_fn(middlewares::localize_errors_fn))
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::very_permissive())
}

/// Loads the user a per-user route is addressed to, 404 if it doesn't exist.
pub(crate) async fn find_user_or_404(
    state: &AppState,
    actor: &AuthenticatedUser,
    user_id: Uuid,
) -> WebResult<UserEntity> {
    UserEntity::find_by_id(state.pool(), actor, user_id)
        .await
        .map_err(|e| WebError::resource_fetch_error(UserEntity::get_resource_type(), e))?
        .ok_or(WebError::resource_not_found(UserEntity::get_resource_type()))
}
