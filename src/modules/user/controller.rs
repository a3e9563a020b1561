use axum::{extract::State, Json};
use std::sync::Arc;

use super::schema::{
    BuyingHistoryEntry, BuyingStats, HistoryResponse, SellingHistoryEntry, SellingStats,
};
use crate::error::ApiError;
use crate::modules::auth::interface::UserRepository;
use crate::modules::auth::schema::UserResponse;
use crate::modules::book::interface::{BookingRepository, ListingRepository};
use crate::modules::book::model::BookingStatus;
use crate::services::session::CurrentUser;
use crate::AppState;

// =============================================================================
// GET /user/profile - Current user
// =============================================================================

pub async fn profile(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

// =============================================================================
// GET /user/history - Selling and buying history
// =============================================================================

pub async fn history(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<HistoryResponse>, ApiError> {
    // Selling side: everything this user has listed, with the ledger
    // status where a reservation exists.
    let listed = state.listings.find_by_seller(&user.id).await?;

    let mut selling_history = Vec::with_capacity(listed.len());
    let mut reserved = 0;
    let mut collected = 0;

    for listing in &listed {
        let status = match state.bookings.find_for_listing(&listing.id).await? {
            Some(booking) => booking.status.as_str().to_string(),
            None => "Available".to_string(),
        };

        match status.as_str() {
            "Booked" => reserved += 1,
            "Sold" => collected += 1,
            _ => {}
        }

        selling_history.push(SellingHistoryEntry {
            id: listing.id.clone(),
            title: listing.title.clone(),
            author: listing.author.clone(),
            category: listing.category.clone(),
            price: listing.price,
            status,
            date: listing.created_at.format("%Y-%m-%d").to_string(),
        });
    }

    let selling_stats = SellingStats {
        listed: listed.len(),
        reserved,
        collected,
    };

    // Buying side: this user's ledger entries joined with listing and
    // seller details.
    let bookings = state.bookings.find_by_buyer(&user.id).await?;

    let mut buying_history = Vec::with_capacity(bookings.len());
    let mut booked = 0;
    let mut sold = 0;

    for booking in &bookings {
        let Some(listing) = state.listings.find_by_id(&booking.listing_id).await? else {
            continue;
        };

        match booking.status {
            BookingStatus::Booked => booked += 1,
            BookingStatus::Sold => sold += 1,
            BookingStatus::NotBooked => {}
        }

        let seller = state.users.find_by_id(&listing.seller_id).await?;

        buying_history.push(BuyingHistoryEntry {
            id: listing.id.clone(),
            title: listing.title,
            status: booking.status.as_str().to_string(),
            price: listing.price,
            date: booking.created_at.format("%Y-%m-%d").to_string(),
            seller: seller
                .as_ref()
                .map(|s| s.full_name.clone())
                .unwrap_or_else(|| "Unknown Seller".to_string()),
            location: seller
                .and_then(|s| s.address)
                .unwrap_or_else(|| "Location Not Available".to_string()),
        });
    }

    // `Booked` counts under both `booked` and `active`: a reporting
    // convenience, not a third lifecycle state.
    let buying_stats = BuyingStats {
        booked,
        active: booked,
        collected: sold,
    };

    Ok(Json(HistoryResponse {
        selling_stats,
        selling_history,
        buying_stats,
        buying_history,
    }))
}
