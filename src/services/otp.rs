use async_trait::async_trait;
use rand::Rng;
use redis::AsyncCommands;

use crate::error::ApiError;

/// Short-lived numeric codes gating the booked -> sold transition.
///
/// At most one live code exists per (listing, buyer) pair; issuing again
/// replaces the previous code. Codes expire 300 seconds after creation
/// and are deleted on successful verification, so each code is single-use.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Replaces any previous code for the pair and returns the new one.
    async fn issue(&self, listing_id: &str, buyer_id: &str) -> Result<String, ApiError>;

    /// True only when a non-expired record matches all three fields.
    async fn validate(
        &self,
        listing_id: &str,
        buyer_id: &str,
        code: &str,
    ) -> Result<bool, ApiError>;

    /// Deletes the record; idempotent when already absent.
    async fn consume(&self, listing_id: &str, buyer_id: &str) -> Result<(), ApiError>;
}

/// Uniformly random 6-digit code.
pub fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

/// Redis-backed store. `SET ... EX` gives the absolute TTL, so expiry is
/// enforced by the storage layer rather than application polling.
pub struct RedisOtpStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl RedisOtpStore {
    pub fn new(redis_url: &str, ttl_secs: u64) -> Result<Self, ApiError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| ApiError::Internal(format!("Failed to create Redis client: {}", e)))?;
        Ok(Self { client, ttl_secs })
    }

    fn key(listing_id: &str, buyer_id: &str) -> String {
        format!("sale_otp:{}:{}", listing_id, buyer_id)
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, ApiError> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| ApiError::dependency(format!("Redis: {}", e)))
    }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
    async fn issue(&self, listing_id: &str, buyer_id: &str) -> Result<String, ApiError> {
        let code = generate_code();
        let mut conn = self.conn().await?;

        // SET overwrites the previous code for the pair and re-arms the TTL.
        let _: () = conn
            .set_ex(Self::key(listing_id, buyer_id), &code, self.ttl_secs)
            .await
            .map_err(|e| ApiError::dependency(format!("Redis: {}", e)))?;

        Ok(code)
    }

    async fn validate(
        &self,
        listing_id: &str,
        buyer_id: &str,
        code: &str,
    ) -> Result<bool, ApiError> {
        let mut conn = self.conn().await?;

        let stored: Option<String> = conn
            .get(Self::key(listing_id, buyer_id))
            .await
            .map_err(|e| ApiError::dependency(format!("Redis: {}", e)))?;

        Ok(stored.as_deref() == Some(code))
    }

    async fn consume(&self, listing_id: &str, buyer_id: &str) -> Result<(), ApiError> {
        let mut conn = self.conn().await?;

        let _: () = conn
            .del(Self::key(listing_id, buyer_id))
            .await
            .map_err(|e| ApiError::dependency(format!("Redis: {}", e)))?;

        Ok(())
    }
}
