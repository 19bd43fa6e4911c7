use axum::{
    Json,
    extract::Request,
    http::{HeaderMap, header::ACCEPT_LANGUAGE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{i18n::Locale, web::LocalizableError};

pub fn request_locale(headers: &HeaderMap) -> Locale {
    headers
        .get(ACCEPT_LANGUAGE)
        .and_then(|value| value.to_str().ok())
        .map(Locale::from_accept_language)
        .unwrap_or_default()
}

/// Re-renders error bodies in the language the client asked for.
pub async fn localize_errors_fn(req: Request, next: Next) -> Response {
    let locale = request_locale(req.headers());
    let response = next.run(req).await;

    if locale == Locale::default() {
        return response;
    }

    match response.extensions().get::<LocalizableError>().cloned() {
        Some(error) => {
            let status = response.status();
            (status, Json(error.localized(locale))).into_response()
        }
        None => response,
    }
}
