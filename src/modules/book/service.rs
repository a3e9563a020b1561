use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use super::interface::{BookingRepository, ListingRepository, Result};
use super::model::{Booking, BookingStatus, Listing, ListingStatus};
use crate::error::ApiError;
use crate::modules::auth::interface::UserRepository;
use crate::modules::auth::model::User;
use crate::services::otp::OtpStore;
use crate::services::sms::{to_e164, SmsSender};

/// Drives the listing lifecycle across the listing row, the booking
/// ledger and the OTP store. All permission and state checks happen here,
/// before any write; the status write itself is a compare-and-swap so
/// concurrent callers racing on one listing cannot both win.
pub struct SaleFlow {
    listings: Arc<dyn ListingRepository>,
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
    otp: Arc<dyn OtpStore>,
    sms: Arc<dyn SmsSender>,
    sms_country_prefix: String,
    app_name: String,
}

impl SaleFlow {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
        otp: Arc<dyn OtpStore>,
        sms: Arc<dyn SmsSender>,
        sms_country_prefix: String,
        app_name: String,
    ) -> Self {
        Self {
            listings,
            bookings,
            users,
            otp,
            sms,
            sms_country_prefix,
            app_name,
        }
    }

    async fn load(&self, listing_id: &str) -> Result<Listing> {
        self.listings
            .find_by_id(listing_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Book not found"))
    }

    /// Reserve a listing for `buyer`.
    pub async fn reserve(&self, listing_id: &str, buyer: &User) -> Result<Listing> {
        let listing = self.load(listing_id).await?;

        if listing.seller_id == buyer.id {
            return Err(ApiError::forbidden("You cannot book your own book"));
        }

        if listing.status != ListingStatus::Available {
            return Err(ApiError::conflict("Book is not available"));
        }

        let won = self
            .listings
            .transition(
                listing_id,
                ListingStatus::Available,
                ListingStatus::Booked,
                Some(&buyer.id),
            )
            .await?;

        if !won {
            // Someone else reserved it between our read and the swap.
            return Err(ApiError::conflict("Book is not available"));
        }

        // Ledger invariant: at most one entry per (listing, buyer).
        self.bookings.delete_for(listing_id, &buyer.id).await?;

        let now = Utc::now();
        self.bookings
            .create(&Booking {
                id: Uuid::new_v4().to_string(),
                buyer_id: buyer.id.clone(),
                listing_id: listing_id.to_string(),
                status: BookingStatus::Booked,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(listing_id, buyer_id = %buyer.id, "listing booked");

        self.load(listing_id).await
    }

    /// Cancel a reservation. Only the current buyer may cancel, and a
    /// completed sale cannot be undone.
    pub async fn cancel(&self, listing_id: &str, caller: &User) -> Result<Listing> {
        let listing = self.load(listing_id).await?;

        if listing.buyer_id.as_deref() != Some(caller.id.as_str()) {
            return Err(ApiError::forbidden("You are not the buyer of this book"));
        }

        if listing.status == ListingStatus::Sold {
            return Err(ApiError::conflict("Book has already been sold"));
        }

        let won = self
            .listings
            .transition(
                listing_id,
                ListingStatus::Booked,
                ListingStatus::Available,
                None,
            )
            .await?;

        if !won {
            return Err(ApiError::conflict("Booking is no longer active"));
        }

        self.bookings.delete_for(listing_id, &caller.id).await?;

        tracing::info!(listing_id, buyer_id = %caller.id, "booking cancelled");

        self.load(listing_id).await
    }

    /// Generate a sale confirmation code and text it to the buyer.
    /// A send failure leaves the stored code intact so the seller can
    /// simply retry.
    pub async fn send_sale_code(&self, listing_id: &str, caller: &User) -> Result<()> {
        let listing = self.load(listing_id).await?;

        if listing.seller_id != caller.id {
            return Err(ApiError::forbidden("Only the seller can generate an OTP"));
        }

        let buyer_id = match (listing.status, &listing.buyer_id) {
            (ListingStatus::Booked, Some(buyer_id)) => buyer_id.clone(),
            _ => return Err(ApiError::conflict("Book is not currently booked")),
        };

        let buyer = self
            .users
            .find_by_id(&buyer_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Buyer not found"))?;

        if buyer.phone.trim().is_empty() {
            return Err(ApiError::validation("Buyer has no phone number on file"));
        }

        let code = self.otp.issue(listing_id, &buyer_id).await?;

        let to = to_e164(&buyer.phone, &self.sms_country_prefix);
        let body = format!(
            "Your OTP for {} is {}. It is valid for 5 minutes.",
            self.app_name, code
        );

        self.sms.send(&to, &body).await?;

        tracing::info!(listing_id, buyer_id = %buyer_id, "sale OTP dispatched");

        Ok(())
    }

    /// Complete the sale: the seller submits the code the buyer received.
    pub async fn confirm_sale(&self, listing_id: &str, caller: &User, code: &str) -> Result<Listing> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ApiError::validation("OTP is required"));
        }

        let listing = self.load(listing_id).await?;

        if listing.seller_id != caller.id {
            return Err(ApiError::forbidden("Only the seller can verify the OTP"));
        }

        let buyer_id = match (listing.status, &listing.buyer_id) {
            (ListingStatus::Booked, Some(buyer_id)) => buyer_id.clone(),
            _ => return Err(ApiError::conflict("Book is not currently booked")),
        };

        // Code, listing and buyer must all match; a TTL-expired record
        // reads as absent and lands here too.
        if !self.otp.validate(listing_id, &buyer_id, code).await? {
            return Err(ApiError::unauthorized("Invalid or expired OTP"));
        }

        let won = self
            .listings
            .transition(
                listing_id,
                ListingStatus::Booked,
                ListingStatus::Sold,
                Some(&buyer_id),
            )
            .await?;

        if !won {
            return Err(ApiError::conflict("Book is not currently booked"));
        }

        self.bookings
            .set_status(listing_id, &buyer_id, BookingStatus::Sold)
            .await?;

        // Consumed on success; the code is single-use.
        self.otp.consume(listing_id, &buyer_id).await?;

        tracing::info!(listing_id, buyer_id = %buyer_id, "sale completed");

        self.load(listing_id).await
    }
}
