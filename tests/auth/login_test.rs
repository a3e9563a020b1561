use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestContext;

#[tokio::test]
async fn login_with_valid_credentials_sets_the_session_cookie() {
    let ctx = TestContext::new().await;
    ctx.signup("ravi").await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "ravi@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["fullName"], "ravi");

    let cookie = response.cookie("session");
    assert!(!cookie.value().is_empty());
}

#[tokio::test]
async fn login_with_wrong_password_returns_unauthorized() {
    let ctx = TestContext::new().await;
    ctx.signup("ravi").await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "ravi@example.com",
            "password": "wrong-password"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_with_unknown_email_returns_unauthorized() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let ctx = TestContext::new().await;
    let session = ctx.signup("ravi").await;

    let response = ctx
        .server
        .post("/auth/logout")
        .add_cookie(session.cookie)
        .await;

    response.assert_status_ok();

    let cleared = response.cookie("session");
    assert!(cleared.value().is_empty());
}
