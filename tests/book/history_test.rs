use serde_json::json;

use crate::common::TestContext;

#[tokio::test]
async fn history_starts_empty() {
    let ctx = TestContext::new().await;
    let user = ctx.signup("newcomer").await;

    let response = ctx
        .server
        .get("/user/history")
        .add_cookie(user.cookie.clone())
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["sellingStats"]["listed"], 0);
    assert_eq!(body["buyingStats"]["booked"], 0);
    assert!(body["sellingHistory"].as_array().unwrap().is_empty());
    assert!(body["buyingHistory"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn selling_history_tracks_the_listing_through_the_sale() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;

    let listing = ctx.create_listing(&seller, "History Book", None).await;
    let listing_id = listing["id"].as_str().unwrap();

    // Freshly listed: available, nothing reserved.
    let body: serde_json::Value = ctx
        .server
        .get("/user/history")
        .add_cookie(seller.cookie.clone())
        .await
        .json();
    assert_eq!(body["sellingStats"]["listed"], 1);
    assert_eq!(body["sellingStats"]["reserved"], 0);
    assert_eq!(body["sellingHistory"][0]["status"], "Available");

    // Booked: counted as reserved.
    ctx.book(&buyer, listing_id).await;

    let body: serde_json::Value = ctx
        .server
        .get("/user/history")
        .add_cookie(seller.cookie.clone())
        .await
        .json();
    assert_eq!(body["sellingStats"]["reserved"], 1);
    assert_eq!(body["sellingHistory"][0]["status"], "Booked");

    // Sold: counted as collected.
    let code = ctx.send_otp(&seller, listing_id).await;
    ctx.server
        .post(&format!("/book/{}/otp/verify", listing_id))
        .add_cookie(seller.cookie.clone())
        .json(&json!({ "otp": code }))
        .await
        .assert_status_ok();

    let body: serde_json::Value = ctx
        .server
        .get("/user/history")
        .add_cookie(seller.cookie.clone())
        .await
        .json();
    assert_eq!(body["sellingStats"]["collected"], 1);
    assert_eq!(body["sellingHistory"][0]["status"], "Sold");
}

#[tokio::test]
async fn buying_history_shows_the_seller_name_and_location() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;

    // The seller's address rides along with the listing.
    let form = axum_test::multipart::MultipartForm::new()
        .add_text("title", "Located Book")
        .add_text("author", "Author")
        .add_text("category", "Textbooks")
        .add_text("price", "450")
        .add_text("desc", "desc")
        .add_text("address", "12 MG Road, Bengaluru")
        .add_part(
            "frontImage",
            axum_test::multipart::Part::bytes(b"front".to_vec())
                .file_name("front.jpg")
                .mime_type("image/jpeg"),
        )
        .add_part(
            "backImage",
            axum_test::multipart::Part::bytes(b"back".to_vec())
                .file_name("back.jpg")
                .mime_type("image/jpeg"),
        );

    let listing: serde_json::Value = ctx
        .server
        .post("/book/add")
        .add_cookie(seller.cookie.clone())
        .multipart(form)
        .await
        .json();
    let listing_id = listing["id"].as_str().unwrap();

    ctx.book(&buyer, listing_id).await;

    let body: serde_json::Value = ctx
        .server
        .get("/user/history")
        .add_cookie(buyer.cookie.clone())
        .await
        .json();

    assert_eq!(body["buyingStats"]["booked"], 1);
    let entry = &body["buyingHistory"][0];
    assert_eq!(entry["title"], "Located Book");
    assert_eq!(entry["status"], "Booked");
    assert_eq!(entry["seller"], "seller");
    assert_eq!(entry["location"], "12 MG Road, Bengaluru");
    // ISO date, e.g. 2026-08-06.
    assert_eq!(entry["date"].as_str().unwrap().len(), 10);
}

#[tokio::test]
async fn cancelled_bookings_leave_the_buying_history() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;

    let listing = ctx.create_listing(&seller, "Changed My Mind", None).await;
    let listing_id = listing["id"].as_str().unwrap();

    ctx.book(&buyer, listing_id).await;
    ctx.server
        .post(&format!("/book/{}/cancel", listing_id))
        .add_cookie(buyer.cookie.clone())
        .await
        .assert_status_ok();

    let body: serde_json::Value = ctx
        .server
        .get("/user/history")
        .add_cookie(buyer.cookie.clone())
        .await
        .json();

    assert_eq!(body["buyingStats"]["booked"], 0);
    assert!(body["buyingHistory"].as_array().unwrap().is_empty());
}
