//! E2E tests for request validation and lookup failures.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::TestHarness;

#[tokio::test]
async fn e2e_missing_identifier() {
    let h = TestHarness::new();
    let (status, json) = h.ask_raw(json!({"question": "What's my salary?"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);
    assert_eq!(json["error"], "Please provide either an employee_id or first_name.");
}

#[tokio::test]
async fn e2e_missing_question() {
    let h = TestHarness::new();
    let (status, _) = h.ask_raw(json!({"employee_id": "EID2480002"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn e2e_unknown_employee() {
    let h = TestHarness::new();
    let (status, json) = h.ask("s1", "EID0000000", "What's my salary?").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Employee not found in the database.");
}

#[tokio::test]
async fn e2e_session_id_generated_when_absent() {
    let h = TestHarness::new();
    let (_, first) = h
        .ask_raw(json!({"question": "asdfghjkl", "first_name": "Thomas"}))
        .await;
    let (_, second) = h
        .ask_raw(json!({"question": "asdfghjkl", "first_name": "Thomas"}))
        .await;
    let a = first["session_id"].as_str().unwrap();
    let b = second["session_id"].as_str().unwrap();
    assert!(!a.is_empty());
    assert_ne!(a, b);
}

#[tokio::test]
async fn e2e_download_for_unknown_employee() {
    let h = TestHarness::new();
    let (status, _) = h.get_text("/api/download-w2/Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn e2e_update_rejects_identity_fields() {
    let h = TestHarness::new();
    let (status, _) = h
        .update_employee("EID2480002", "first name", json!("Tom"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.csv_contents().contains("Thomas"));
}
