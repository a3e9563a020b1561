use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Listing, ListingStatus};
use crate::modules::auth::model::User;

// =============================================================================
// BROWSE
// =============================================================================

/// Geo params must be supplied together; `distance` is kilometers.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub distance: Option<f64>,
}

// =============================================================================
// CREATE
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
}

/// Fields collected from the multipart form before validation.
#[derive(Debug, Default)]
pub struct ListingForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub desc: Option<String>,
    pub address: Option<String>,
    pub location: Option<GeoLocation>,
    pub front_image: Option<(Vec<u8>, String)>,
    pub back_image: Option<(Vec<u8>, String)>,
}

// =============================================================================
// OTP
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub otp: String,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerSummary {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub avatar: String,
    pub address: Option<String>,
}

impl From<&User> for SellerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
            address: user.address.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: f64,
    pub desc: String,
    pub front_image: String,
    pub back_image: String,
    pub status: ListingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<SellerSummary>,
    pub buyer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationResponse>,
    pub created_at: DateTime<Utc>,
}

impl ListingResponse {
    pub fn from_listing(listing: Listing, seller: Option<&User>) -> Self {
        let location = match (listing.latitude, listing.longitude) {
            (Some(latitude), Some(longitude)) => Some(LocationResponse {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Self {
            id: listing.id,
            title: listing.title,
            author: listing.author,
            category: listing.category,
            price: listing.price,
            desc: listing.description,
            front_image: listing.front_image,
            back_image: listing.back_image,
            status: listing.status,
            seller: seller.map(Into::into),
            buyer_id: listing.buyer_id,
            location,
            created_at: listing.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
