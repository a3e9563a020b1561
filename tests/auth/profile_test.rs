use axum::http::StatusCode;
use serde_json::json;

use crate::common::TestContext;

#[tokio::test]
async fn profile_requires_a_session() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/user/profile").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_returns_the_current_user() {
    let ctx = TestContext::new().await;
    let session = ctx.signup("meera").await;

    let response = ctx
        .server
        .get("/user/profile")
        .add_cookie(session.cookie)
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["id"], session.id.as_str());
    assert_eq!(body["fullName"], "meera");
}

#[tokio::test]
async fn update_profile_uploads_the_avatar() {
    let ctx = TestContext::new().await;
    let session = ctx.signup("meera").await;

    let response = ctx
        .server
        .put("/auth/update-profile")
        .add_cookie(session.cookie)
        .json(&json!({
            "avatar": "data:image/png;base64,aGVsbG8="
        }))
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body["avatar"]
        .as_str()
        .unwrap()
        .starts_with("https://media.invalid/avatars/"));
    assert_eq!(ctx.media.upload_count(), 1);
}

#[tokio::test]
async fn update_profile_rejects_a_non_image_avatar() {
    let ctx = TestContext::new().await;
    let session = ctx.signup("meera").await;

    let response = ctx
        .server
        .put("/auth/update-profile")
        .add_cookie(session.cookie)
        .json(&json!({
            "avatar": "https://example.com/avatar.png"
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.media.upload_count(), 0);
}

#[tokio::test]
async fn update_profile_can_set_the_address_alone() {
    let ctx = TestContext::new().await;
    let session = ctx.signup("meera").await;

    let response = ctx
        .server
        .put("/auth/update-profile")
        .add_cookie(session.cookie.clone())
        .json(&json!({
            "address": "12 MG Road, Bengaluru"
        }))
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["address"], "12 MG Road, Bengaluru");
}
