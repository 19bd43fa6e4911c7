mod common;
use axum::http::StatusCode;
use learnhub::model::entity::UserEntity;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::common::{Action, Flow, setup_server, setup_test_db, signin_admin_action, signup_action};

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("Invalid JSON format")
}

fn points_path(user: &str) -> impl Fn(&common::FlowContext) -> String + Send + Sync + 'static {
    let user = user.to_string();
    move |ctx| {
        let user = ctx.get_json::<UserEntity>(&user);
        format!("/api/v1/points/{}", user.id())
    }
}

#[tokio::test]
async fn route_points_award_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signup_action("alice", "alice").with_save_as("alice"))
        // no row yet, reads as zero
        .step(
            Action::new("points_get", "GET", "dynamic")
                .with_dyn_path(points_path("alice"))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["points"], 0);
                    assert_eq!(res["level"], 1);
                    assert_eq!(res["points_to_next_level"], 100);
                }),
        )
        // points are earned, not self-awarded
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 1000 }))
                .with_expect(StatusCode::FORBIDDEN)
                .assert_body(|body| assert_eq!(parse(body)["status_code"], "403")),
        )
        .step(
            Action::new("points_get", "GET", "dynamic")
                .with_dyn_path(points_path("alice"))
                .assert_body(|body| assert_eq!(parse(body)["points"], 0)),
        )
        .step(signin_admin_action().with_clear_cookies(true))
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 150 }))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["points"], 150);
                    assert_eq!(res["level"], 2);
                    assert_eq!(res["points_to_next_level"], 50);
                    assert_eq!(res["leveled_up"], true);
                    assert_eq!(res["unlocked"][0]["code"], "points_100");
                }),
        )
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 10 }))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["points"], 160);
                    assert_eq!(res["leveled_up"], false);
                    assert_eq!(res["unlocked"], json!([]));
                }),
        )
        .step(
            Action::new("points_get", "GET", "dynamic")
                .with_dyn_path(points_path("alice"))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["points"], 160);
                    assert_eq!(res["level"], 2);
                }),
        )
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 0 }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 1001 }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": "ten" }))
                .with_expect(StatusCode::BAD_REQUEST),
        )
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(|_| format!("/api/v1/points/{}", Uuid::new_v4()))
                .with_body(json!({ "amount": 0 }))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_points_access_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(
            signup_action("alice", "alice")
                .with_save_cookies(false)
                .with_save_as("alice"),
        )
        .step(signup_action("bob", "bob"))
        .step(
            Action::new("points_get", "GET", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 10 }))
                .with_expect(StatusCode::FORBIDDEN),
        )
        // access is decided before the amount is looked at
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 0 }))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("points_get", "GET", "dynamic")
                .with_dyn_path(|_| format!("/api/v1/points/{}", Uuid::new_v4()))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("points_get", "GET", "/api/v1/points/not-a-uuid")
                .with_expect(StatusCode::BAD_REQUEST)
                .with_header("accept-language", "es")
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["status_code"], "400");
                    assert_eq!(res["message"], "Error de solicitud, valor inválido.");
                }),
        )
        .step(
            Action::new("leaderboard", "GET", "/api/v1/points/leaderboard")
                .with_param("limit", "lots")
                .with_expect(StatusCode::BAD_REQUEST)
                .assert_body(|body| assert_eq!(parse(body)["status_code"], "400")),
        )
        // admins may award anybody
        .step(signin_admin_action().with_clear_cookies(true))
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 42 }))
                .assert_body(|body| assert_eq!(parse(body)["points"], 42)),
        )
        .step(
            Action::new("points_get", "GET", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_clear_cookies(true)
                .with_expect(StatusCode::UNAUTHORIZED),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_points_leaderboard_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_admin_action())
        .step(
            signup_action("alice", "alice")
                .with_save_cookies(false)
                .with_save_as("alice"),
        )
        .step(
            signup_action("bob", "bob")
                .with_save_cookies(false)
                .with_save_as("bob"),
        )
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("alice"))
                .with_body(json!({ "amount": 30 })),
        )
        .step(
            Action::new("points_award", "POST", "dynamic")
                .with_dyn_path(points_path("bob"))
                .with_body(json!({ "amount": 70 })),
        )
        .step(
            Action::new("leaderboard", "GET", "/api/v1/points/leaderboard").assert_body(|body| {
                let rows = parse(body);
                let rows = rows.as_array().unwrap();
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0]["username"], "bob");
                assert_eq!(rows[0]["points"], 70);
                assert_eq!(rows[1]["username"], "alice");
            }),
        )
        .step(
            Action::new("leaderboard", "GET", "/api/v1/points/leaderboard")
                .with_param("limit", "1")
                .assert_body(|body| {
                    let rows = parse(body);
                    assert_eq!(rows.as_array().unwrap().len(), 1);
                    assert_eq!(rows[0]["username"], "bob");
                }),
        )
        .run(&mut server, db)
        .await;
}
