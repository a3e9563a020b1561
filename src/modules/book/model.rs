use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Listing lifecycle. `Booked` is the only state with a backward edge
/// (cancellation); nothing leaves `Sold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ListingStatus {
    Available,
    Booked,
    Sold,
}

/// Ledger entry status mirroring the listing it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum BookingStatus {
    Booked,
    #[serde(rename = "Not Booked")]
    #[sqlx(rename = "Not Booked")]
    NotBooked,
    Sold,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::NotBooked => "Not Booked",
            Self::Sold => "Sold",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Listing {
    pub id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub price: f64,
    pub description: String,
    pub front_image: String,
    pub back_image: String,
    pub seller_id: String,
    pub buyer_id: Option<String>,
    pub status: ListingStatus,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One reservation record per active booking, keyed by (listing, buyer).
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: String,
    pub buyer_id: String,
    pub listing_id: String,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
