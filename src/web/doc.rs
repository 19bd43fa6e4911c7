use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    crate::web::middlewares::AUTH_TOKEN,
                    "JWT token for current user",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Learnhub API"),
    paths(
        crate::web::routes::user::user_signup_handler,
        crate::web::routes::user::user_signin_handler,
        crate::web::routes::user::user_signout_handler,
        crate::web::routes::user::user_verify_handler,
        crate::web::routes::user::user_list_handler,
        crate::web::routes::user::user_update_handler,
        crate::web::routes::user::user_delete_handler,
        crate::web::routes::lessons::lessons_list_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::exercises::exercises_get_handler,
        crate::web::routes::progress::progress_get_handler,
        crate::web::routes::progress::progress_complete_handler,
        crate::web::routes::points::points_get_handler,
        crate::web::routes::points::points_award_handler,
        crate::web::routes::points::points_leaderboard_handler,
        crate::web::routes::streaks::streaks_get_handler,
        crate::web::routes::streaks::streaks_record_handler,
        crate::web::routes::achievements::achievements_get_handler,
        crate::web::routes::achievements::achievements_unlock_handler,
    ),
    tags(
        (name = "account", description = "Sign up, sign in and account management"),
        (name = "lessons", description = "Lessons, guidelines and examples"),
        (name = "exercises", description = "Exercises attached to lessons"),
        (name = "progress", description = "Completion of content"),
        (name = "points", description = "Points, levels and leaderboard"),
        (name = "streaks", description = "Daily activity streaks"),
        (name = "achievements", description = "Badges unlocked by reaching thresholds"),
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/v1/account/signup",
            "/api/v1/lessons/{key}",
            "/api/v1/progress",
            "/api/v1/points/leaderboard",
            "/api/v1/streaks/{user_id}",
            "/api/v1/achievements/{user_id}",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing {expected} in {paths:?}"
            );
        }
    }

    #[test]
    fn test_cookie_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("cookie"));
    }
}
