use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    auth::CryptError,
    error::log_error,
    i18n::{Locale, MessageKey},
    model::{DatabaseError, ResourceType},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("RegistrationUserConflict")]
    RegistrationUserConflict,
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("AuthenticationCookieInvalid, cookie: {cookie}. Error: {error}")]
    AuthenticationCookieInvalid {
        cookie: String,
        error: jsonwebtoken::errors::Error,
    },

    #[error("AuthenticationRequired")]
    AuthenticationRequired,

    #[error("AuthenticationInvalidCredentials")]
    AuthenticationInvalidCredentials,
}

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceForbidden: {resource_type:?}")]
    ResourceForbidden { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("RequestBadBody: {details}")]
    RequestBadBody { details: String },

    #[error("RequestInvalidValue: `{field}` {reason}")]
    RequestInvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("ServerCryptError: {0}")]
    ServerCryptError(#[from] crate::auth::CryptError),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn message_key(&self) -> MessageKey {
        MessageKey::ServerInternal
    }
}

impl RegistrationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RegistrationUserConflict => StatusCode::CONFLICT,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::RegistrationUserConflict => MessageKey::RegistrationUserConflict,
        }
    }
}

impl AuthenticationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            Self::AuthenticationInvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::AuthenticationCookieInvalid { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::AuthenticationCookieInvalid { .. } => MessageKey::AuthenticationCookieInvalid,
            Self::AuthenticationRequired => MessageKey::AuthenticationRequired,
            Self::AuthenticationInvalidCredentials => MessageKey::AuthenticationInvalidCredentials,
        }
    }
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceForbidden { .. } => StatusCode::FORBIDDEN,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::ResourceNotFound { .. } => MessageKey::ResourceNotFound,
            Self::ResourceForbidden { .. } => MessageKey::ResourceForbidden,
            Self::ResourceFetchError { .. } => MessageKey::ResourceFetchError,
        }
    }
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::RequestBadBody { .. } => MessageKey::RequestBadBody,
            Self::RequestInvalidValue { .. } => MessageKey::RequestInvalidValue,
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("AuthenticationError - {0}")]
    AuthenticationError(#[from] AuthenticationError),
    #[error("RegistrationError - {0}")]
    RegistrationError(#[from] RegistrationError),
    #[error("RequestError - {0}")]
    RequestError(#[from] RequestError),
    #[error("ServerError - {0}")]
    ServerError(#[from] ServerError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    pub fn resource_forbidden(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceForbidden {
            resource_type: r#type,
        })
    }

    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        Self::ResourceError(ResourceError::ResourceFetchError {
            resource_type: r#type,
            error,
        })
    }

    /// Like [`WebError::resource_fetch_error`] but keeps a failed access check a 403.
    pub fn resource_access_error(r#type: ResourceType, error: DatabaseError) -> Self {
        match error {
            DatabaseError::Forbidden => Self::resource_forbidden(r#type),
            error => Self::resource_fetch_error(r#type, error),
        }
    }

    pub fn auth_cookie_invalid<S: Into<String>>(
        cookie: S,
        error: jsonwebtoken::errors::Error,
    ) -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationCookieInvalid {
            cookie: cookie.into(),
            error,
        })
    }

    pub fn auth_required() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationRequired)
    }

    pub fn auth_invalid_credentials() -> Self {
        Self::AuthenticationError(AuthenticationError::AuthenticationInvalidCredentials)
    }

    pub fn registration_conflict() -> Self {
        Self::RegistrationError(RegistrationError::RegistrationUserConflict)
    }

    pub fn bad_body<S: Into<String>>(details: S) -> Self {
        Self::RequestError(RequestError::RequestBadBody {
            details: details.into(),
        })
    }

    pub fn invalid_value<S: Into<String>>(field: &'static str, reason: S) -> Self {
        Self::RequestError(RequestError::RequestInvalidValue {
            field,
            reason: reason.into(),
        })
    }

    pub fn server_crypt_error(e: CryptError) -> Self {
        Self::ServerError(ServerError::ServerCryptError(e))
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::RegistrationError(e) => e.status_code(),
            Self::AuthenticationError(e) => e.status_code(),
            Self::RequestError(e) => e.status_code(),
            Self::ServerError(e) => e.status_code(),
        }
    }

    pub fn message_key(&self) -> MessageKey {
        match self {
            Self::ResourceError(e) => e.message_key(),
            Self::RegistrationError(e) => e.message_key(),
            Self::AuthenticationError(e) => e.message_key(),
            Self::RequestError(e) => e.message_key(),
            Self::ServerError(e) => e.message_key(),
        }
    }

    pub fn client_display(&self, locale: Locale) -> String {
        self.message_key().translate(locale).to_string()
    }
}

#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

/// Attached to every error response so the locale middleware can re-render
/// the message.
#[derive(Debug, Clone)]
pub struct LocalizableError {
    pub key: MessageKey,
    pub body: ErrorResponse,
}

impl LocalizableError {
    pub fn localized(self, locale: Locale) -> ErrorResponse {
        ErrorResponse {
            message: self.key.translate(locale).to_string(),
            ..self.body
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let key = self.message_key();

        let body = ErrorResponse {
            message: self.client_display(Locale::default()),
            status_code: status_code.as_str().to_string(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        let mut response = (status_code, Json(body.clone())).into_response();
        response
            .extensions_mut()
            .insert(LocalizableError { key, body });
        response
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WebError::resource_not_found(ResourceType::Lesson).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(WebError::auth_required().status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(WebError::registration_conflict().status_code(), StatusCode::CONFLICT);
        assert_eq!(
            WebError::invalid_value("amount", "must be positive").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WebError::resource_fetch_error(
                ResourceType::UserPoints,
                DatabaseError::InvalidValue("x".into())
            )
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_access_error_keeps_forbidden() {
        let err = WebError::resource_access_error(ResourceType::UserStreak, DatabaseError::Forbidden);
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_client_display_is_translated() {
        let err = WebError::resource_not_found(ResourceType::Exercise);
        assert_eq!(err.client_display(Locale::En), "Resource error, resource not found.");
        assert_eq!(
            err.client_display(Locale::Es),
            "Error de recurso, recurso no encontrado."
        );
    }

    #[test]
    fn test_response_carries_localizable_extension() {
        let response = WebError::auth_required().into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let ext = response.extensions().get::<LocalizableError>().cloned().unwrap();
        assert_eq!(ext.key, MessageKey::AuthenticationRequired);
        assert_eq!(ext.localized(Locale::Es).message, "Se requiere autenticación.");
    }
}
