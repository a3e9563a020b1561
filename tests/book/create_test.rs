use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};

use crate::common::TestContext;

#[tokio::test]
async fn create_listing_uploads_both_covers_and_returns_created() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;

    let listing = ctx
        .create_listing(&seller, "Introduction to Algorithms", None)
        .await;

    assert_eq!(listing["status"], "Available");
    assert_eq!(listing["title"], "Introduction to Algorithms");
    assert_eq!(listing["price"], 450.0);
    assert!(listing["frontImage"]
        .as_str()
        .unwrap()
        .starts_with("https://media.invalid/books/"));
    assert!(listing["backImage"]
        .as_str()
        .unwrap()
        .starts_with("https://media.invalid/books/"));
    assert_eq!(listing["seller"]["fullName"], "seller");
    assert!(listing["buyerId"].is_null());
    assert_eq!(ctx.media.upload_count(), 2);
}

#[tokio::test]
async fn create_listing_requires_a_session() {
    let ctx = TestContext::new().await;

    let form = MultipartForm::new().add_text("title", "Orphan Book");
    let response = ctx.server.post("/book/add").multipart(form).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_listing_with_a_missing_text_field_returns_bad_request() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;

    // No author.
    let form = MultipartForm::new()
        .add_text("title", "Incomplete Book")
        .add_text("category", "Textbooks")
        .add_text("price", "450")
        .add_text("desc", "desc")
        .add_part(
            "frontImage",
            Part::bytes(b"front".to_vec())
                .file_name("front.jpg")
                .mime_type("image/jpeg"),
        )
        .add_part(
            "backImage",
            Part::bytes(b"back".to_vec())
                .file_name("back.jpg")
                .mime_type("image/jpeg"),
        );

    let response = ctx
        .server
        .post("/book/add")
        .add_cookie(seller.cookie.clone())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(ctx.media.upload_count(), 0);
}

#[tokio::test]
async fn create_listing_with_a_missing_image_returns_bad_request() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;

    let form = MultipartForm::new()
        .add_text("title", "One Cover Only")
        .add_text("author", "Author")
        .add_text("category", "Textbooks")
        .add_text("price", "450")
        .add_text("desc", "desc")
        .add_part(
            "frontImage",
            Part::bytes(b"front".to_vec())
                .file_name("front.jpg")
                .mime_type("image/jpeg"),
        );

    let response = ctx
        .server
        .post("/book/add")
        .add_cookie(seller.cookie.clone())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Both front and back images are required");
}

#[tokio::test]
async fn create_listing_with_a_non_positive_price_returns_bad_request() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;

    let form = MultipartForm::new()
        .add_text("title", "Free Book")
        .add_text("author", "Author")
        .add_text("category", "Textbooks")
        .add_text("price", "0")
        .add_text("desc", "desc")
        .add_part(
            "frontImage",
            Part::bytes(b"front".to_vec())
                .file_name("front.jpg")
                .mime_type("image/jpeg"),
        )
        .add_part(
            "backImage",
            Part::bytes(b"back".to_vec())
                .file_name("back.jpg")
                .mime_type("image/jpeg"),
        );

    let response = ctx
        .server
        .post("/book/add")
        .add_cookie(seller.cookie.clone())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_address_is_written_to_the_seller_profile() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;

    let form = MultipartForm::new()
        .add_text("title", "Book With Address")
        .add_text("author", "Author")
        .add_text("category", "Textbooks")
        .add_text("price", "450")
        .add_text("desc", "desc")
        .add_text("address", "12 MG Road, Bengaluru")
        .add_part(
            "frontImage",
            Part::bytes(b"front".to_vec())
                .file_name("front.jpg")
                .mime_type("image/jpeg"),
        )
        .add_part(
            "backImage",
            Part::bytes(b"back".to_vec())
                .file_name("back.jpg")
                .mime_type("image/jpeg"),
        );

    let response = ctx
        .server
        .post("/book/add")
        .add_cookie(seller.cookie.clone())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::CREATED);

    let profile: serde_json::Value = ctx
        .server
        .get("/user/profile")
        .add_cookie(seller.cookie.clone())
        .await
        .json();
    assert_eq!(profile["address"], "12 MG Road, Bengaluru");
}
