use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::{BookingRepository, ListingQuery, ListingRepository, Result};
use super::model::{Booking, BookingStatus, Listing, ListingStatus};

// =============================================================================
// LISTING CRUD
// =============================================================================

pub struct ListingCrud {
    pool: Pool<MySql>,
}

impl ListingCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ListingRepository for ListingCrud {
    async fn create(&self, listing: &Listing) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO listings (
                id, title, author, category, price, description,
                front_image, back_image, seller_id, buyer_id, status,
                longitude, latitude, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&listing.id)
        .bind(&listing.title)
        .bind(&listing.author)
        .bind(&listing.category)
        .bind(listing.price)
        .bind(&listing.description)
        .bind(&listing.front_image)
        .bind(&listing.back_image)
        .bind(&listing.seller_id)
        .bind(&listing.buyer_id)
        .bind(listing.status)
        .bind(listing.longitude)
        .bind(listing.latitude)
        .bind(listing.created_at)
        .bind(listing.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Listing>> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn list(&self, query: ListingQuery) -> Result<Vec<Listing>> {
        match query.near {
            Some(geo) => sqlx::query_as::<_, Listing>(
                r#"
                SELECT * FROM listings
                WHERE status = 'Available'
                  AND latitude IS NOT NULL
                  AND longitude IS NOT NULL
                  AND ST_Distance_Sphere(POINT(longitude, latitude), POINT(?, ?)) <= ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(geo.longitude)
            .bind(geo.latitude)
            .bind(geo.radius_m)
            .fetch_all(&self.pool)
            .await
            .map_err(Into::into),
            None => {
                sqlx::query_as::<_, Listing>("SELECT * FROM listings ORDER BY created_at DESC")
                    .fetch_all(&self.pool)
                    .await
                    .map_err(Into::into)
            }
        }
    }

    async fn find_by_seller(&self, seller_id: &str) -> Result<Vec<Listing>> {
        sqlx::query_as::<_, Listing>(
            "SELECT * FROM listings WHERE seller_id = ? ORDER BY created_at DESC",
        )
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn transition(
        &self,
        id: &str,
        from: ListingStatus,
        to: ListingStatus,
        buyer_id: Option<&str>,
    ) -> Result<bool> {
        // Status check and write are one statement, so concurrent callers
        // racing on the same listing serialize on the row: exactly one
        // observes `from` and wins.
        let result = sqlx::query(
            "UPDATE listings SET status = ?, buyer_id = ?, updated_at = NOW() WHERE id = ? AND status = ?",
        )
        .bind(to)
        .bind(buyer_id)
        .bind(id)
        .bind(from)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// BOOKING LEDGER CRUD
// =============================================================================

pub struct BookingCrud {
    pool: Pool<MySql>,
}

impl BookingCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for BookingCrud {
    async fn create(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, buyer_id, listing_id, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.buyer_id)
        .bind(&booking.listing_id)
        .bind(booking.status)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_for(&self, listing_id: &str, buyer_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM bookings WHERE listing_id = ? AND buyer_id = ?")
            .bind(listing_id)
            .bind(buyer_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn set_status(
        &self,
        listing_id: &str,
        buyer_id: &str,
        status: BookingStatus,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE bookings SET status = ?, updated_at = NOW() WHERE listing_id = ? AND buyer_id = ?",
        )
        .bind(status)
        .bind(listing_id)
        .bind(buyer_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_for_listing(&self, listing_id: &str) -> Result<Option<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE listing_id = ? ORDER BY created_at DESC LIMIT 1",
        )
        .bind(listing_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn find_by_buyer(&self, buyer_id: &str) -> Result<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE buyer_id = ? ORDER BY created_at DESC",
        )
        .bind(buyer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn count_for_listing(&self, listing_id: &str) -> Result<usize> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bookings WHERE listing_id = ?")
            .bind(listing_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 as usize)
    }
}
