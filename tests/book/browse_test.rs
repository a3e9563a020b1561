use axum::http::StatusCode;

use crate::common::TestContext;

// Bengaluru and Mumbai city centres; ~840 km apart.
const BLR: (f64, f64) = (12.9716, 77.5946);
const BOM: (f64, f64) = (19.0760, 72.8777);

#[tokio::test]
async fn browse_requires_a_session() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/book").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn browse_returns_listings_newest_first_with_seller_summaries() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let reader = ctx.signup("reader").await;

    ctx.create_listing(&seller, "First Book", None).await;
    ctx.create_listing(&seller, "Second Book", None).await;

    let response = ctx
        .server
        .get("/book")
        .add_cookie(reader.cookie.clone())
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 2);
    assert_eq!(listings[0]["title"], "Second Book");
    assert_eq!(listings[1]["title"], "First Book");
    assert_eq!(listings[0]["seller"]["fullName"], "seller");
}

#[tokio::test]
async fn geo_filter_keeps_only_available_listings_inside_the_radius() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let reader = ctx.signup("reader").await;

    ctx.create_listing(&seller, "Near Book", Some(BLR)).await;
    ctx.create_listing(&seller, "Far Book", Some(BOM)).await;
    ctx.create_listing(&seller, "Untagged Book", None).await;

    let response = ctx
        .server
        .get("/book")
        .add_query_param("lat", BLR.0)
        .add_query_param("long", BLR.1)
        .add_query_param("distance", 50)
        .add_cookie(reader.cookie.clone())
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["title"], "Near Book");
}

#[tokio::test]
async fn geo_filter_excludes_booked_listings() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;

    let listing = ctx.create_listing(&seller, "Near Book", Some(BLR)).await;
    ctx.book(&buyer, listing["id"].as_str().unwrap()).await;

    let response = ctx
        .server
        .get("/book")
        .add_query_param("lat", BLR.0)
        .add_query_param("long", BLR.1)
        .add_query_param("distance", 50)
        .add_cookie(buyer.cookie.clone())
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn browse_without_the_filter_includes_booked_listings() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;

    let listing = ctx.create_listing(&seller, "Near Book", Some(BLR)).await;
    ctx.book(&buyer, listing["id"].as_str().unwrap()).await;

    let response = ctx
        .server
        .get("/book")
        .add_cookie(buyer.cookie.clone())
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    let listings = body.as_array().unwrap();
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["status"], "Booked");
}

#[tokio::test]
async fn partial_geo_params_are_rejected() {
    let ctx = TestContext::new().await;
    let reader = ctx.signup("reader").await;

    let response = ctx
        .server
        .get("/book")
        .add_query_param("lat", BLR.0)
        .add_cookie(reader.cookie.clone())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}
