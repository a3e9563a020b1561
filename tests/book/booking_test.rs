use axum::http::StatusCode;

use bookbay::modules::book::interface::{BookingRepository, ListingRepository};

use crate::common::TestContext;

#[tokio::test]
async fn booking_reserves_the_listing_for_the_buyer() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;

    let listing = ctx.create_listing(&seller, "Wanted Book", None).await;
    let listing_id = listing["id"].as_str().unwrap();

    let booked = ctx.book(&buyer, listing_id).await;

    assert_eq!(booked["status"], "Booked");
    assert_eq!(booked["buyerId"], buyer.id.as_str());

    // One ledger row for the pair.
    assert_eq!(ctx.bookings.count_for_listing(listing_id).await.unwrap(), 1);
}

#[tokio::test]
async fn booking_your_own_listing_is_forbidden() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;

    let listing = ctx.create_listing(&seller, "My Own Book", None).await;
    let listing_id = listing["id"].as_str().unwrap();

    let response = ctx
        .server
        .post(&format!("/book/{}/book", listing_id))
        .add_cookie(seller.cookie.clone())
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(ctx.bookings.count_for_listing(listing_id).await.unwrap(), 0);

    let listing = ctx.listings.find_by_id(listing_id).await.unwrap().unwrap();
    assert!(listing.buyer_id.is_none());
}

#[tokio::test]
async fn booking_an_already_booked_listing_conflicts() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;
    let latecomer = ctx.signup("latecomer").await;

    let listing = ctx.create_listing(&seller, "Popular Book", None).await;
    let listing_id = listing["id"].as_str().unwrap();

    ctx.book(&buyer, listing_id).await;

    let response = ctx
        .server
        .post(&format!("/book/{}/book", listing_id))
        .add_cookie(latecomer.cookie.clone())
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(ctx.bookings.count_for_listing(listing_id).await.unwrap(), 1);
}

#[tokio::test]
async fn booking_an_unknown_listing_is_not_found() {
    let ctx = TestContext::new().await;
    let buyer = ctx.signup("buyer").await;

    let response = ctx
        .server
        .post("/book/no-such-listing/book")
        .add_cookie(buyer.cookie.clone())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelling_restores_the_listing() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;

    let listing = ctx.create_listing(&seller, "Second Thoughts", None).await;
    let listing_id = listing["id"].as_str().unwrap();

    ctx.book(&buyer, listing_id).await;

    let response = ctx
        .server
        .post(&format!("/book/{}/cancel", listing_id))
        .add_cookie(buyer.cookie.clone())
        .await;

    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "Available");
    assert!(body["buyerId"].is_null());
    assert_eq!(ctx.bookings.count_for_listing(listing_id).await.unwrap(), 0);
}

#[tokio::test]
async fn cancelling_a_listing_you_did_not_book_is_forbidden() {
    let ctx = TestContext::new().await;
    let seller = ctx.signup("seller").await;
    let buyer = ctx.signup("buyer").await;
    let stranger = ctx.signup("stranger").await;

    let listing = ctx.create_listing(&seller, "Contested Book", None).await;
    let listing_id = listing["id"].as_str().unwrap();

    ctx.book(&buyer, listing_id).await;

    let response = ctx
        .server
        .post(&format!("/book/{}/cancel", listing_id))
        .add_cookie(stranger.cookie.clone())
        .await;

    response.assert_status(StatusCode::FORBIDDEN);

    // Nothing changed.
    let listing = ctx.listings.find_by_id(listing_id).await.unwrap().unwrap();
    assert_eq!(listing.buyer_id.as_deref(), Some(buyer.id.as_str()));
    assert_eq!(ctx.bookings.count_for_listing(listing_id).await.unwrap(), 1);
}
