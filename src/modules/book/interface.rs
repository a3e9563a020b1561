use async_trait::async_trait;

use super::model::{Booking, BookingStatus, Listing, ListingStatus};
use crate::error::ApiError;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Radius filter around a point; radius is meters.
#[derive(Debug, Clone, Copy)]
pub struct GeoFilter {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ListingQuery {
    /// When set, only `Available` listings inside the radius are returned.
    pub near: Option<GeoFilter>,
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create(&self, listing: &Listing) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Listing>>;
    /// Newest first.
    async fn list(&self, query: ListingQuery) -> Result<Vec<Listing>>;
    async fn find_by_seller(&self, seller_id: &str) -> Result<Vec<Listing>>;
    /// Compare-and-swap on the status column: the listing moves from
    /// `from` to `to` (writing `buyer_id` in the same statement) only if it
    /// is still in `from`. Returns false when another caller got there
    /// first. This is the only write path for listing state.
    async fn transition(
        &self,
        id: &str,
        from: ListingStatus,
        to: ListingStatus,
        buyer_id: Option<&str>,
    ) -> Result<bool>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &Booking) -> Result<()>;
    /// Removes the ledger entry for the pair; no-op when absent.
    async fn delete_for(&self, listing_id: &str, buyer_id: &str) -> Result<()>;
    async fn set_status(
        &self,
        listing_id: &str,
        buyer_id: &str,
        status: BookingStatus,
    ) -> Result<()>;
    async fn find_for_listing(&self, listing_id: &str) -> Result<Option<Booking>>;
    async fn find_by_buyer(&self, buyer_id: &str) -> Result<Vec<Booking>>;
    /// Count of entries for a listing, used by tests to assert the
    /// double-reserve race leaves a single row.
    async fn count_for_listing(&self, listing_id: &str) -> Result<usize>;
}
