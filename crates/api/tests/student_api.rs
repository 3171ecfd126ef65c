//! HTTP-level tests for the student portal: outcome submission, drive
//! listing and the progress view.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, post_json_auth, student_token};
use serde_json::json;
use sqlx::PgPool;

fn outcomes_uri(drive_id: i64) -> String {
    format!("/api/v1/student/drives/{drive_id}/outcomes")
}

#[sqlx::test(migrations = "../db/migrations")]
async fn pass_creates_participation_and_advances(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let token = student_token(&seed.asha);

    let response = post_json_auth(
        app,
        &outcomes_uri(seed.drive.id),
        json!({ "round_id": seed.rounds[0].id, "result": "PASS" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"]["result"], "PASS");
    assert!(json["data"]["outcome"]["verified_by"].is_null());
    assert_eq!(json["data"]["participation"]["status"], "IN_PROGRESS");
    assert_eq!(json["data"]["active_round_id"], seed.rounds[1].id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn fail_eliminates_and_clears_active_round(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let token = student_token(&seed.asha);

    let response = post_json_auth(
        app.clone(),
        &outcomes_uri(seed.drive.id),
        json!({
            "round_id": seed.rounds[0].id,
            "result": "FAIL",
            "reflection": "Ran out of time on the puzzles",
            "questions": "Two trains problem",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["participation"]["status"], "ELIMINATED");
    assert!(json["data"]["active_round_id"].is_null());

    let progress = body_json(
        get_auth(
            app,
            &format!("/api/v1/student/drives/{}", seed.drive.id),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(progress["data"]["status"], "ELIMINATED");
    assert_eq!(progress["data"]["outcomes"].as_array().unwrap().len(), 1);
    assert_eq!(progress["data"]["rounds"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn fail_without_reflection_writes_nothing(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);
    let token = student_token(&seed.asha);

    let response = post_json_auth(
        app.clone(),
        &outcomes_uri(seed.drive.id),
        json!({ "round_id": seed.rounds[0].id, "result": "FAIL", "reflection": "   " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let progress = body_json(
        get_auth(
            app,
            &format!("/api/v1/student/drives/{}", seed.drive.id),
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(progress["data"]["status"], "OPEN");
    assert!(progress["data"]["participation"].is_null());
    assert_eq!(progress["data"]["active_round_id"], seed.rounds[0].id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_result_is_rejected(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &outcomes_uri(seed.drive.id),
        json!({ "round_id": seed.rounds[0].id, "result": "MAYBE" }),
        &student_token(&seed.asha),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn round_from_another_drive_is_rejected(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let other = common::create_drive(&pool, seed.batch_id, "Globex", "Analyst").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &outcomes_uri(other.id),
        json!({ "round_id": seed.rounds[0].id, "result": "PASS" }),
        &student_token(&seed.asha),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn drive_of_another_batch_is_forbidden(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &outcomes_uri(seed.drive.id),
        json!({ "round_id": seed.rounds[0].id, "result": "PASS" }),
        &student_token(&seed.outsider),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_token_is_unauthorized(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.clone(),
        &outcomes_uri(seed.drive.id),
        json!({ "round_id": seed.rounds[0].id, "result": "PASS" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");

    let response = get(app, "/api/v1/student/drives").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn placement_rep_cannot_submit_outcomes(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &outcomes_uri(seed.drive.id),
        json!({ "round_id": seed.rounds[0].id, "result": "PASS" }),
        &common::placement_rep_token(seed.batch_id),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn drive_list_reports_open_for_untouched_drives(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let untouched = common::create_drive(&pool, seed.batch_id, "Globex", "Analyst").await;
    common::create_drive(&pool, seed.other_batch_id, "Initech", "QA").await;
    let app = common::build_test_app(pool);
    let token = student_token(&seed.asha);

    post_json_auth(
        app.clone(),
        &outcomes_uri(seed.drive.id),
        json!({ "round_id": seed.rounds[0].id, "result": "PASS" }),
        &token,
    )
    .await;

    let response = get_auth(app, "/api/v1/student/drives", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let drives = json["data"].as_array().unwrap();
    assert_eq!(drives.len(), 2, "only drives of the student's batch");

    let status_of = |id: i64| {
        drives
            .iter()
            .find(|d| d["id"] == id)
            .map(|d| d["status"].clone())
            .unwrap()
    };
    assert_eq!(status_of(seed.drive.id), "IN_PROGRESS");
    assert_eq!(status_of(untouched.id), "OPEN");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn class_rep_submits_as_a_student(pool: PgPool) {
    let seed = common::seed(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &outcomes_uri(seed.drive.id),
        json!({ "round_id": seed.rounds[0].id, "result": "PASS" }),
        &student_token(&seed.meera),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["outcome"]["student_id"], seed.meera.id);
}
