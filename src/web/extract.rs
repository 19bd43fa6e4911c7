use axum::extract::{
    FromRequest, FromRequestParts,
    rejection::{JsonRejection, PathRejection, QueryRejection},
};

use crate::web::WebError;

/// `axum::Json` whose rejections render as our 400 error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct JsonBody<T>(pub T);

/// `axum::extract::Query` with the same error body as [`JsonBody`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(WebError))]
pub struct QueryParams<T>(pub T);

/// `axum::extract::Path` with the same error body as [`JsonBody`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(WebError))]
pub struct PathParam<T>(pub T);

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        WebError::bad_body(rejection.body_text())
    }
}

impl From<QueryRejection> for WebError {
    fn from(rejection: QueryRejection) -> Self {
        WebError::invalid_value("query", rejection.body_text())
    }
}

impl From<PathRejection> for WebError {
    fn from(rejection: PathRejection) -> Self {
        WebError::invalid_value("path", rejection.body_text())
    }
}

#[cfg(test)]
mod test {
    use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Limit {
        #[allow(unused)]
        limit: i64,
    }

    async fn by_id(PathParam(_id): PathParam<Uuid>) -> impl IntoResponse {
        StatusCode::OK
    }

    async fn by_limit(QueryParams(_q): QueryParams<Limit>) -> impl IntoResponse {
        StatusCode::OK
    }

    fn server() -> TestServer {
        let app = Router::new()
            .route("/items/{id}", get(by_id))
            .route("/items", get(by_limit));
        TestServer::new(app).unwrap()
    }

    #[tokio::test]
    async fn test_bad_path_renders_error_body() {
        let server = server();

        let resp = server.get("/items/not-a-uuid").expect_failure().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body = resp.json::<Value>();
        assert_eq!(body["status_code"], "400");
        assert_eq!(body["message"], "Request error, invalid value.");

        let resp = server.get(&format!("/items/{}", Uuid::new_v4())).await;
        resp.assert_status(StatusCode::OK);
    }

    #[tokio::test]
    async fn test_bad_query_renders_error_body() {
        let server = server();

        let resp = server.get("/items?limit=many").expect_failure().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(resp.json::<Value>()["status_code"], "400");

        let resp = server.get("/items?limit=5").await;
        resp.assert_status(StatusCode::OK);
    }
}
