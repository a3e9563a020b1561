use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestContext;

#[tokio::test]
async fn signup_with_valid_data_returns_created_and_a_session() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/signup")
        .json(&json!({
            "fullName": "Asha Rao",
            "email": "asha@example.com",
            "password": "password123",
            "phone": "9876543210"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: serde_json::Value = response.json();
    assert!(body.get("id").is_some());
    assert_eq!(body["fullName"], "Asha Rao");
    assert_eq!(body["email"], "asha@example.com");
    // Hash must never leak.
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    // Placeholder avatar until one is uploaded.
    assert!(body["avatar"].as_str().unwrap().starts_with("https://"));

    let cookie = response.cookie("session");
    assert!(!cookie.value().is_empty());
}

#[tokio::test]
async fn signup_with_short_password_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/signup")
        .json(&json!({
            "fullName": "Asha Rao",
            "email": "asha@example.com",
            "password": "short",
            "phone": "9876543210"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_with_invalid_email_returns_bad_request() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/signup")
        .json(&json!({
            "fullName": "Asha Rao",
            "email": "not-an-email",
            "password": "password123",
            "phone": "9876543210"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signup_with_existing_email_returns_conflict() {
    let ctx = TestContext::new().await;
    ctx.signup("asha").await;

    let response = ctx
        .server
        .post("/auth/signup")
        .json(&json!({
            "fullName": "Another Name",
            "email": "asha@example.com",
            "password": "password123",
            "phone": "9876543210"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body: serde_json::Value = response.json();
    assert!(body.get("error").is_some());
}
