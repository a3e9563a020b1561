//! In-memory implementations of the storage and collaborator traits.
//!
//! Used by the test suites to run the full HTTP stack without MySQL,
//! Redis or any external gateway. Not wired in production builds.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::ApiError;
use crate::modules::auth::interface::UserRepository;
use crate::modules::auth::model::User;
use crate::modules::book::geo::distance_m;
use crate::modules::book::interface::{
    BookingRepository, ListingQuery, ListingRepository, Result,
};
use crate::modules::book::model::{Booking, BookingStatus, Listing, ListingStatus};
use crate::services::media::MediaStore;
use crate::services::otp::{generate_code, OtpStore};
use crate::services::sms::SmsSender;

// =============================================================================
// USERS
// =============================================================================

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserStore {
    async fn create(&self, user: &User) -> Result<()> {
        self.users
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.email == email))
    }

    async fn full_name_exists(&self, full_name: &str) -> Result<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.full_name == full_name))
    }

    async fn update_profile(
        &self,
        id: &str,
        avatar: Option<&str>,
        address: Option<&str>,
    ) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.get_mut(id) {
            if let Some(avatar) = avatar {
                user.avatar = avatar.to_string();
            }
            if let Some(address) = address {
                user.address = Some(address.to_string());
            }
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

// =============================================================================
// LISTINGS
// =============================================================================

#[derive(Default)]
pub struct MemoryListingStore {
    listings: Mutex<HashMap<String, Listing>>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ListingRepository for MemoryListingStore {
    async fn create(&self, listing: &Listing) -> Result<()> {
        self.listings
            .lock()
            .unwrap()
            .insert(listing.id.clone(), listing.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Listing>> {
        Ok(self.listings.lock().unwrap().get(id).cloned())
    }

    async fn list(&self, query: ListingQuery) -> Result<Vec<Listing>> {
        let listings = self.listings.lock().unwrap();
        let mut result: Vec<Listing> = match query.near {
            Some(geo) => listings
                .values()
                .filter(|l| l.status == ListingStatus::Available)
                .filter(|l| match (l.latitude, l.longitude) {
                    (Some(lat), Some(lon)) => {
                        distance_m(geo.latitude, geo.longitude, lat, lon) <= geo.radius_m
                    }
                    _ => false,
                })
                .cloned()
                .collect(),
            None => listings.values().cloned().collect(),
        };

        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn find_by_seller(&self, seller_id: &str) -> Result<Vec<Listing>> {
        let listings = self.listings.lock().unwrap();
        let mut result: Vec<Listing> = listings
            .values()
            .filter(|l| l.seller_id == seller_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn transition(
        &self,
        id: &str,
        from: ListingStatus,
        to: ListingStatus,
        buyer_id: Option<&str>,
    ) -> Result<bool> {
        // Check and write under one lock, mirroring the single-statement
        // UPDATE of the SQL implementation.
        let mut listings = self.listings.lock().unwrap();
        match listings.get_mut(id) {
            Some(listing) if listing.status == from => {
                listing.status = to;
                listing.buyer_id = buyer_id.map(String::from);
                listing.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// =============================================================================
// BOOKING LEDGER
// =============================================================================

#[derive(Default)]
pub struct MemoryBookingStore {
    bookings: Mutex<Vec<Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for MemoryBookingStore {
    async fn create(&self, booking: &Booking) -> Result<()> {
        self.bookings.lock().unwrap().push(booking.clone());
        Ok(())
    }

    async fn delete_for(&self, listing_id: &str, buyer_id: &str) -> Result<()> {
        self.bookings
            .lock()
            .unwrap()
            .retain(|b| !(b.listing_id == listing_id && b.buyer_id == buyer_id));
        Ok(())
    }

    async fn set_status(
        &self,
        listing_id: &str,
        buyer_id: &str,
        status: BookingStatus,
    ) -> Result<()> {
        let mut bookings = self.bookings.lock().unwrap();
        for booking in bookings
            .iter_mut()
            .filter(|b| b.listing_id == listing_id && b.buyer_id == buyer_id)
        {
            booking.status = status;
            booking.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn find_for_listing(&self, listing_id: &str) -> Result<Option<Booking>> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .max_by_key(|b| b.created_at)
            .cloned())
    }

    async fn find_by_buyer(&self, buyer_id: &str) -> Result<Vec<Booking>> {
        let bookings = self.bookings.lock().unwrap();
        let mut result: Vec<Booking> = bookings
            .iter()
            .filter(|b| b.buyer_id == buyer_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn count_for_listing(&self, listing_id: &str) -> Result<usize> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .count())
    }
}

// =============================================================================
// OTP STORE
// =============================================================================

/// Emulates the Redis TTL with explicit expiry timestamps swept lazily on
/// every access.
pub struct MemoryOtpStore {
    codes: Mutex<HashMap<(String, String), (String, DateTime<Utc>)>>,
    ttl: Duration,
}

impl MemoryOtpStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(300))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    fn sweep(codes: &mut HashMap<(String, String), (String, DateTime<Utc>)>) {
        let now = Utc::now();
        codes.retain(|_, (_, expires_at)| *expires_at > now);
    }

    /// Test hook: the live code for a pair, if any.
    pub fn current_code(&self, listing_id: &str, buyer_id: &str) -> Option<String> {
        let mut codes = self.codes.lock().unwrap();
        Self::sweep(&mut codes);
        codes
            .get(&(listing_id.to_string(), buyer_id.to_string()))
            .map(|(code, _)| code.clone())
    }
}

impl Default for MemoryOtpStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpStore for MemoryOtpStore {
    async fn issue(&self, listing_id: &str, buyer_id: &str) -> Result<String> {
        let code = generate_code();
        let mut codes = self.codes.lock().unwrap();
        Self::sweep(&mut codes);
        // Insert replaces any previous code for the pair.
        codes.insert(
            (listing_id.to_string(), buyer_id.to_string()),
            (code.clone(), Utc::now() + self.ttl),
        );
        Ok(code)
    }

    async fn validate(&self, listing_id: &str, buyer_id: &str, code: &str) -> Result<bool> {
        let mut codes = self.codes.lock().unwrap();
        Self::sweep(&mut codes);
        Ok(codes
            .get(&(listing_id.to_string(), buyer_id.to_string()))
            .map(|(stored, _)| stored == code)
            .unwrap_or(false))
    }

    async fn consume(&self, listing_id: &str, buyer_id: &str) -> Result<()> {
        self.codes
            .lock()
            .unwrap()
            .remove(&(listing_id.to_string(), buyer_id.to_string()));
        Ok(())
    }
}

// =============================================================================
// SMS
// =============================================================================

#[derive(Debug, Clone)]
pub struct SentSms {
    pub to: String,
    pub body: String,
}

/// Records every dispatched message; can be switched into a failing mode
/// to exercise the gateway-down path.
#[derive(Default)]
pub struct RecordingSms {
    sent: Mutex<Vec<SentSms>>,
    failing: Mutex<bool>,
}

impl RecordingSms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn sent(&self) -> Vec<SentSms> {
        self.sent.lock().unwrap().clone()
    }

    /// First run of six consecutive digits in the most recent message.
    pub fn last_code(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let body = &sent.last()?.body;

        let bytes = body.as_bytes();
        let mut start = 0;
        while start + 6 <= bytes.len() {
            if bytes[start..start + 6].iter().all(u8::is_ascii_digit) {
                return Some(body[start..start + 6].to_string());
            }
            start += 1;
        }
        None
    }
}

#[async_trait]
impl SmsSender for RecordingSms {
    async fn send(&self, to_e164: &str, body: &str) -> std::result::Result<(), ApiError> {
        if *self.failing.lock().unwrap() {
            return Err(ApiError::dependency("SMS gateway unavailable"));
        }

        self.sent.lock().unwrap().push(SentSms {
            to: to_e164.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

// =============================================================================
// MEDIA
// =============================================================================

/// Accepts any upload and hands back a deterministic fake URL.
#[derive(Default)]
pub struct FakeMediaStore {
    uploads: Mutex<Vec<String>>,
}

impl FakeMediaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl MediaStore for FakeMediaStore {
    async fn upload_data_uri(
        &self,
        _data_uri: &str,
        folder: &str,
    ) -> std::result::Result<String, ApiError> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push(folder.to_string());
        Ok(format!(
            "https://media.invalid/{}/upload-{}.jpg",
            folder,
            uploads.len()
        ))
    }
}
