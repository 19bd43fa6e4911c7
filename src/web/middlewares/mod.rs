mod auth;
pub use auth::{AUTH_TOKEN, extract_context_fn};

mod locale;
pub use locale::{localize_errors_fn, request_locale};
