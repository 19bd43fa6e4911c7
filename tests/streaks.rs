mod common;
use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use learnhub::model::entity::UserEntity;
use serde_json::Value;
use uuid::Uuid;

use crate::common::{Action, Flow, FlowDatabase, setup_server, setup_test_db, signin_action, signup_action};

fn parse(body: &str) -> Value {
    serde_json::from_str(body).expect("Invalid JSON format")
}

fn streaks_path(user: &str) -> impl Fn(&common::FlowContext) -> String + Send + Sync + 'static {
    let user = user.to_string();
    move |ctx| {
        let user = ctx.get_json::<UserEntity>(&user);
        format!("/api/v1/streaks/{}", user.id())
    }
}

async fn seed_streak(db: &FlowDatabase, user_id: Uuid, current: i32, longest: i32, last: NaiveDate) {
    sqlx::query(
        "INSERT INTO user_streaks (user_id, current_streak, longest_streak, last_activity_date) VALUES ($1,$2,$3,$4)",
    )
    .bind(user_id)
    .bind(current)
    .bind(longest)
    .bind(last)
    .execute(db.pool())
    .await
    .unwrap();
}

#[tokio::test]
async fn route_streak_record_test() {
    let db = setup_test_db().await;
    let mut server = setup_server(&db).await;
    let today = Utc::now().date_naive().to_string();

    Flow::new()
        .step(signup_action("daily", "daily").with_save_as("daily"))
        .step(
            Action::new("streaks_get", "GET", "dynamic")
                .with_dyn_path(streaks_path("daily"))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["current_streak"], 0);
                    assert_eq!(res["longest_streak"], 0);
                    assert_eq!(res["last_activity_date"], Value::Null);
                    assert_eq!(res["is_active"], false);
                }),
        )
        .step(
            Action::new("streaks_record", "POST", "dynamic")
                .with_dyn_path(streaks_path("daily"))
                .assert_body(move |body| {
                    let res = parse(body);
                    assert_eq!(res["current_streak"], 1);
                    assert_eq!(res["longest_streak"], 1);
                    assert_eq!(res["last_activity_date"], today.as_str());
                    assert_eq!(res["change"], "started");
                    assert_eq!(res["is_active"], true);
                }),
        )
        // same day again keeps the streak
        .step(
            Action::new("streaks_record", "POST", "dynamic")
                .with_dyn_path(streaks_path("daily"))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["current_streak"], 1);
                    assert_eq!(res["change"], "unchanged");
                }),
        )
        .run(&mut server, db)
        .await;
}

#[tokio::test]
async fn route_streak_extend_and_reset_test() {
    let db = setup_test_db().await;
    let today = Utc::now().date_naive();

    let regular = db.seed_user("regular", "regular").await;
    seed_streak(&db, regular.id(), 2, 2, today - Duration::days(1)).await;

    let lapsed = db.seed_user("lapsed", "lapsed").await;
    seed_streak(&db, lapsed.id(), 4, 4, today - Duration::days(5)).await;

    let regular_id = regular.id();
    let lapsed_id = lapsed.id();
    let mut server = setup_server(&db).await;

    Flow::new()
        .step(signin_action("regular", "regular"))
        .step(
            Action::new("streaks_record", "POST", "dynamic")
                .with_dyn_path(move |_| format!("/api/v1/streaks/{regular_id}"))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["current_streak"], 3);
                    assert_eq!(res["longest_streak"], 3);
                    assert_eq!(res["change"], "extended");
                    assert_eq!(res["unlocked"][0]["code"], "streak_3");
                }),
        )
        .step(signin_action("lapsed", "lapsed").with_clear_cookies(true))
        .step(
            Action::new("streaks_get", "GET", "dynamic")
                .with_dyn_path(move |_| format!("/api/v1/streaks/{lapsed_id}"))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["current_streak"], 4);
                    assert_eq!(res["is_active"], false);
                }),
        )
        .step(
            Action::new("streaks_record", "POST", "dynamic")
                .with_dyn_path(move |_| format!("/api/v1/streaks/{lapsed_id}"))
                .assert_body(|body| {
                    let res = parse(body);
                    assert_eq!(res["current_streak"], 1);
                    assert_eq!(res["longest_streak"], 4);
                    assert_eq!(res["change"], "reset");
                    // the longest streak already qualified for this one
                    assert_eq!(res["unlocked"][0]["code"], "streak_3");
                }),
        )
        // somebody else's streak
        .step(
            Action::new("streaks_get", "GET", "dynamic")
                .with_dyn_path(move |_| format!("/api/v1/streaks/{regular_id}"))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("streaks_record", "POST", "dynamic")
                .with_dyn_path(move |_| format!("/api/v1/streaks/{regular_id}"))
                .with_expect(StatusCode::FORBIDDEN),
        )
        .step(
            Action::new("streaks_record", "POST", "dynamic")
                .with_dyn_path(|_| format!("/api/v1/streaks/{}", Uuid::new_v4()))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .run(&mut server, db)
        .await;
}
