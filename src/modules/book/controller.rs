use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::interface::{GeoFilter, ListingQuery, ListingRepository};
use super::model::{Listing, ListingStatus};
use super::schema::{
    BrowseQuery, ListingForm, ListingResponse, MessageResponse, VerifyOtpRequest,
};
use super::service::SaleFlow;
use crate::error::ApiError;
use crate::modules::auth::interface::UserRepository;
use crate::modules::auth::model::User;
use crate::services::media::{bytes_to_data_uri, MediaStore};
use crate::services::session::CurrentUser;
use crate::AppState;

fn sale_flow(state: &AppState) -> SaleFlow {
    SaleFlow::new(
        state.listings.clone(),
        state.bookings.clone(),
        state.users.clone(),
        state.otp.clone(),
        state.sms.clone(),
        state.options.sms_country_prefix.clone(),
        state.options.app_name.clone(),
    )
}

async fn with_seller(state: &AppState, listing: Listing) -> Result<ListingResponse, ApiError> {
    let seller = state.users.find_by_id(&listing.seller_id).await?;
    Ok(ListingResponse::from_listing(listing, seller.as_ref()))
}

// =============================================================================
// GET /book - Browse listings
// =============================================================================

pub async fn browse(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Query(query): Query<BrowseQuery>,
) -> Result<Json<Vec<ListingResponse>>, ApiError> {
    let near = match (query.lat, query.long, query.distance) {
        (Some(latitude), Some(longitude), Some(distance_km)) => {
            if distance_km <= 0.0 {
                return Err(ApiError::validation("Distance must be positive"));
            }
            Some(GeoFilter {
                latitude,
                longitude,
                radius_m: distance_km * 1000.0,
            })
        }
        (None, None, None) => None,
        _ => {
            return Err(ApiError::validation(
                "lat, long and distance must be provided together",
            ))
        }
    };

    let listings = state.listings.list(ListingQuery { near }).await?;

    // Sellers repeat across listings; resolve each once.
    let mut sellers: HashMap<String, Option<User>> = HashMap::new();
    let mut responses = Vec::with_capacity(listings.len());

    for listing in listings {
        let seller = match sellers.get(&listing.seller_id) {
            Some(cached) => cached.clone(),
            None => {
                let fetched = state.users.find_by_id(&listing.seller_id).await?;
                sellers.insert(listing.seller_id.clone(), fetched.clone());
                fetched
            }
        };
        responses.push(ListingResponse::from_listing(listing, seller.as_ref()));
    }

    Ok(Json(responses))
}

// =============================================================================
// POST /book/add - Create a listing
// =============================================================================

async fn parse_listing_form(mut multipart: Multipart) -> Result<ListingForm, ApiError> {
    let mut form = ListingForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        let text_err = |e| ApiError::validation(format!("Malformed field: {}", e));

        match name.as_str() {
            "title" => form.title = Some(field.text().await.map_err(text_err)?),
            "author" => form.author = Some(field.text().await.map_err(text_err)?),
            "category" => form.category = Some(field.text().await.map_err(text_err)?),
            "desc" => form.desc = Some(field.text().await.map_err(text_err)?),
            "address" => form.address = Some(field.text().await.map_err(text_err)?),
            "price" => {
                let raw = field.text().await.map_err(text_err)?;
                form.price = Some(
                    raw.trim()
                        .parse()
                        .map_err(|_| ApiError::validation("Price must be a number"))?,
                );
            }
            "location" => {
                let raw = field.text().await.map_err(text_err)?;
                if !raw.trim().is_empty() {
                    form.location = Some(serde_json::from_str(&raw).map_err(|_| {
                        ApiError::validation(
                            "Location must be JSON with latitude and longitude",
                        )
                    })?);
                }
            }
            "frontImage" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "image/jpeg".to_string());
                let bytes = field.bytes().await.map_err(text_err)?;
                form.front_image = Some((bytes.to_vec(), content_type));
            }
            "backImage" => {
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "image/jpeg".to_string());
                let bytes = field.bytes().await.map_err(text_err)?;
                form.back_image = Some((bytes.to_vec(), content_type));
            }
            _ => {}
        }
    }

    Ok(form)
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ListingResponse>), ApiError> {
    let form = parse_listing_form(multipart).await?;

    let (title, author, category, desc) = match (
        form.title.filter(|v| !v.trim().is_empty()),
        form.author.filter(|v| !v.trim().is_empty()),
        form.category.filter(|v| !v.trim().is_empty()),
        form.desc.filter(|v| !v.trim().is_empty()),
    ) {
        (Some(t), Some(a), Some(c), Some(d)) => (t, a, c, d),
        _ => return Err(ApiError::validation("All text fields are required")),
    };

    let price = form
        .price
        .ok_or_else(|| ApiError::validation("All text fields are required"))?;
    if price <= 0.0 {
        return Err(ApiError::validation("Price must be a positive number"));
    }

    let (front, back) = match (form.front_image, form.back_image) {
        (Some(front), Some(back)) => (front, back),
        _ => {
            return Err(ApiError::validation(
                "Both front and back images are required",
            ))
        }
    };

    if front.0.is_empty() || back.0.is_empty() {
        return Err(ApiError::validation(
            "Both front and back images are required",
        ));
    }

    // The seller's address rides along with the listing form.
    if let Some(address) = form.address.as_deref().filter(|a| !a.trim().is_empty()) {
        state
            .users
            .update_profile(&user.id, None, Some(address))
            .await?;
    }

    let front_url = state
        .media
        .upload_data_uri(&bytes_to_data_uri(&front.0, &front.1), "books")
        .await?;
    let back_url = state
        .media
        .upload_data_uri(&bytes_to_data_uri(&back.0, &back.1), "books")
        .await?;

    let now = Utc::now();
    let listing = Listing {
        id: Uuid::new_v4().to_string(),
        title,
        author,
        category,
        price,
        description: desc,
        front_image: front_url,
        back_image: back_url,
        seller_id: user.id.clone(),
        buyer_id: None,
        status: ListingStatus::Available,
        longitude: form.location.as_ref().map(|l| l.longitude),
        latitude: form.location.as_ref().map(|l| l.latitude),
        created_at: now,
        updated_at: now,
    };

    state.listings.create(&listing).await?;
    state.metrics.listings_created_total.inc();

    tracing::info!(listing_id = %listing.id, seller_id = %user.id, "listing created");

    // The seller record may have just gained an address.
    let seller = state.users.find_by_id(&user.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ListingResponse::from_listing(listing, seller.as_ref())),
    ))
}

// =============================================================================
// POST /book/{id}/book - Reserve
// =============================================================================

pub async fn reserve(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let listing = sale_flow(&state).reserve(&id, &user).await?;
    state.metrics.bookings_total.inc();
    Ok(Json(with_seller(&state, listing).await?))
}

// =============================================================================
// POST /book/{id}/cancel - Cancel a reservation
// =============================================================================

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let listing = sale_flow(&state).cancel(&id, &user).await?;
    state.metrics.booking_cancellations_total.inc();
    Ok(Json(with_seller(&state, listing).await?))
}

// =============================================================================
// POST /book/{id}/otp/send - Dispatch the sale confirmation code
// =============================================================================

pub async fn send_sale_code(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    sale_flow(&state).send_sale_code(&id, &user).await?;
    state.metrics.otp_sent_total.inc();
    Ok(Json(MessageResponse {
        message: "OTP sent to the buyer",
    }))
}

// =============================================================================
// POST /book/{id}/otp/verify - Complete the sale
// =============================================================================

pub async fn confirm_sale(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<ListingResponse>, ApiError> {
    let result = sale_flow(&state).confirm_sale(&id, &user, &req.otp).await;

    match result {
        Ok(listing) => {
            state.metrics.sales_completed_total.inc();
            Ok(Json(with_seller(&state, listing).await?))
        }
        Err(err) => {
            if matches!(err, ApiError::Unauthorized(_)) {
                state.metrics.otp_rejected_total.inc();
            }
            Err(err)
        }
    }
}
