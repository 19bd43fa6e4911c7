use super::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    ResourceNotFound,
    ResourceForbidden,
    ResourceFetchError,
    AuthenticationCookieInvalid,
    AuthenticationRequired,
    AuthenticationInvalidCredentials,
    RegistrationUserConflict,
    RequestBadBody,
    RequestInvalidValue,
    ServerInternal,
}

impl MessageKey {
    pub const ALL: [MessageKey; 10] = [
        Self::ResourceNotFound,
        Self::ResourceForbidden,
        Self::ResourceFetchError,
        Self::AuthenticationCookieInvalid,
        Self::AuthenticationRequired,
        Self::AuthenticationInvalidCredentials,
        Self::RegistrationUserConflict,
        Self::RequestBadBody,
        Self::RequestInvalidValue,
        Self::ServerInternal,
    ];

    pub fn translate(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.english(),
            Locale::Es => self.spanish(),
        }
    }

    fn english(&self) -> &'static str {
        match self {
            Self::ResourceNotFound => "Resource error, resource not found.",
            Self::ResourceForbidden => "Resource error, resource forbidden.",
            Self::ResourceFetchError => "Resource error, unable to fetch resource.",
            Self::AuthenticationCookieInvalid => "Authentication error, cookie invalid.",
            Self::AuthenticationRequired => "Authentication required.",
            Self::AuthenticationInvalidCredentials => {
                "Authentication error, user not found or password is invalid."
            }
            Self::RegistrationUserConflict => "Registration error, user already exists.",
            Self::RequestBadBody => "Request error, body is malformed.",
            Self::RequestInvalidValue => "Request error, invalid value.",
            Self::ServerInternal => "Internal server error.",
        }
    }

    fn spanish(&self) -> &'static str {
        match self {
            Self::ResourceNotFound => "Error de recurso, recurso no encontrado.",
            Self::ResourceForbidden => "Error de recurso, acceso prohibido.",
            Self::ResourceFetchError => "Error de recurso, no se pudo obtener el recurso.",
            Self::AuthenticationCookieInvalid => "Error de autenticación, cookie inválida.",
            Self::AuthenticationRequired => "Se requiere autenticación.",
            Self::AuthenticationInvalidCredentials => {
                "Error de autenticación, usuario no encontrado o contraseña incorrecta."
            }
            Self::RegistrationUserConflict => "Error de registro, el usuario ya existe.",
            Self::RequestBadBody => "Error de solicitud, el cuerpo está mal formado.",
            Self::RequestInvalidValue => "Error de solicitud, valor inválido.",
            Self::ServerInternal => "Error interno del servidor.",
        }
    }
}
