//! HTTP-level tests for the verification queue, VERIFY / REJECT decisions,
//! the resulting notification and the insights feed.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, placement_rep_token, post_json_auth, student_token, Seed};
use placement_core::channels::{EVENT_OUTCOME_VERIFIED, OUTCOME_VERIFIED_MESSAGE};
use serde_json::json;
use sqlx::PgPool;

/// Submit a FAIL for Asha's first round and return the outcome id.
async fn submit_fail(app: axum::Router, seed: &Seed) -> i64 {
    let response = post_json_auth(
        app,
        &format!("/api/v1/student/drives/{}/outcomes", seed.drive.id),
        json!({
            "round_id": seed.rounds[0].id,
            "result": "FAIL",
            "reflection": "Brush up on dynamic programming",
            "questions": "Longest increasing subsequence",
        }),
        &student_token(&seed.asha),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["outcome"]["id"]
        .as_i64()
        .unwrap()
}

fn decide_uri(outcome_id: i64) -> String {
    format!("/api/v1/verification/outcomes/{outcome_id}")
}

#[sqlx::test(migrations = "../db/migrations")]
async fn pending_queue_lists_unverified_outcomes(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let outcome_id = submit_fail(app.clone(), &seed).await;

    let response = get_auth(
        app,
        "/api/v1/verification/outcomes",
        &student_token(&seed.meera),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let pending = json["data"].as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["id"], outcome_id);
    assert_eq!(pending[0]["student_name"], "Asha");
    assert_eq!(pending[0]["round_name"], "Aptitude");
    assert_eq!(pending[0]["company_name"], "Acme");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verify_marks_outcome_and_notifies_student(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let state = common::build_test_state(pool);
    let mut events = state.event_bus.subscribe();
    let app = common::app_from_state(state);
    let outcome_id = submit_fail(app.clone(), &seed).await;

    let response = post_json_auth(
        app.clone(),
        &decide_uri(outcome_id),
        json!({ "action": "VERIFY" }),
        &student_token(&seed.meera),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["action"], "VERIFY");
    assert_eq!(json["data"]["outcome"]["verified_by"], seed.meera.id);

    let event = events.try_recv().expect("one event per verification");
    assert_eq!(event.event_type, EVENT_OUTCOME_VERIFIED);
    assert_eq!(event.channel, format!("student-{}", seed.asha.id));
    assert_eq!(event.payload["message"], OUTCOME_VERIFIED_MESSAGE);
    assert!(events.try_recv().is_err());

    let pending = body_json(
        get_auth(
            app,
            "/api/v1/verification/outcomes",
            &student_token(&seed.meera),
        )
        .await,
    )
    .await;
    assert!(pending["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reverify_overwrites_verifier(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let outcome_id = submit_fail(app.clone(), &seed).await;

    post_json_auth(
        app.clone(),
        &decide_uri(outcome_id),
        json!({ "action": "VERIFY" }),
        &student_token(&seed.meera),
    )
    .await;
    let response = post_json_auth(
        app,
        &decide_uri(outcome_id),
        json!({ "action": "VERIFY" }),
        &placement_rep_token(seed.batch_id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["outcome"]["verified_by"],
        9_000
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn reject_deletes_outcome_and_keeps_elimination(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let state = common::build_test_state(pool);
    let mut events = state.event_bus.subscribe();
    let app = common::app_from_state(state);
    let outcome_id = submit_fail(app.clone(), &seed).await;

    let response = post_json_auth(
        app.clone(),
        &decide_uri(outcome_id),
        json!({ "action": "REJECT" }),
        &student_token(&seed.meera),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["action"], "REJECT");
    assert_eq!(json["data"]["outcome_id"], outcome_id);
    assert_eq!(json["data"]["participation"]["status"], "ELIMINATED");
    assert!(events.try_recv().is_err(), "rejection publishes nothing");

    let progress = body_json(
        get_auth(
            app.clone(),
            &format!("/api/v1/student/drives/{}", seed.drive.id),
            &student_token(&seed.asha),
        )
        .await,
    )
    .await;
    assert_eq!(progress["data"]["status"], "ELIMINATED");
    assert!(progress["data"]["outcomes"].as_array().unwrap().is_empty());
    assert!(progress["data"]["active_round_id"].is_null());

    let again = post_json_auth(
        app,
        &decide_uri(outcome_id),
        json!({ "action": "VERIFY" }),
        &student_token(&seed.meera),
    )
    .await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_outcome_is_not_found(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &decide_uri(424_242),
        json!({ "action": "VERIFY" }),
        &placement_rep_token(seed.batch_id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn plain_student_cannot_verify(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let outcome_id = submit_fail(app.clone(), &seed).await;

    let response = post_json_auth(
        app,
        &decide_uri(outcome_id),
        json!({ "action": "VERIFY" }),
        &student_token(&seed.ravi),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn verifier_of_another_batch_is_forbidden(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let outcome_id = submit_fail(app.clone(), &seed).await;

    let response = post_json_auth(
        app,
        &decide_uri(outcome_id),
        json!({ "action": "REJECT" }),
        &placement_rep_token(seed.other_batch_id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn insights_show_only_verified_reflections(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let outcome_id = submit_fail(app.clone(), &seed).await;
    let token = student_token(&seed.ravi);

    let before = body_json(get_auth(app.clone(), "/api/v1/insights", &token).await).await;
    assert!(before["data"].as_array().unwrap().is_empty());

    post_json_auth(
        app.clone(),
        &decide_uri(outcome_id),
        json!({ "action": "VERIFY" }),
        &student_token(&seed.meera),
    )
    .await;

    let after = body_json(get_auth(app.clone(), "/api/v1/insights", &token).await).await;
    let insights = after["data"].as_array().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0]["reflection"], "Brush up on dynamic programming");
    assert_eq!(insights[0]["batch_name"], "CSE 2026");

    let filtered = body_json(
        get_auth(
            app,
            &format!("/api/v1/insights?drive_id={}", seed.drive.id + 1_000),
            &token,
        )
        .await,
    )
    .await;
    assert!(filtered["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn insights_filter_by_role_substring(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let outcome_id = submit_fail(app.clone(), &seed).await;
    post_json_auth(
        app.clone(),
        &decide_uri(outcome_id),
        json!({ "action": "VERIFY" }),
        &student_token(&seed.meera),
    )
    .await;
    let token = student_token(&seed.ravi);

    let matching = body_json(get_auth(app.clone(), "/api/v1/insights?role=sde", &token).await).await;
    assert_eq!(matching["data"].as_array().unwrap().len(), 1);
    assert_eq!(matching["data"][0]["role"], "SDE");

    let blank = body_json(get_auth(app.clone(), "/api/v1/insights?role=", &token).await).await;
    assert_eq!(blank["data"].as_array().unwrap().len(), 1);

    let other = body_json(get_auth(app, "/api/v1/insights?role=analyst", &token).await).await;
    assert!(other["data"].as_array().unwrap().is_empty());
}
