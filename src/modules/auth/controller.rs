use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::interface::UserRepository;
use super::model::{User, UserRole, DEFAULT_AVATAR};
use super::schema::{
    LoginRequest, MessageResponse, SignupRequest, UpdateProfileRequest, UserResponse,
};
use crate::error::ApiError;
use crate::services::hashing;
use crate::services::media::{is_image_data_uri, MediaStore};
use crate::services::session::{clear_session_cookie, session_cookie, CurrentUser};
use crate::AppState;

pub async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::validation(e.to_string()))?;

    if state.users.email_exists(&req.email).await? {
        return Err(ApiError::conflict("Email already exists"));
    }

    if state.users.full_name_exists(&req.full_name).await? {
        return Err(ApiError::conflict("Full name already taken"));
    }

    let password_hash = hashing::hash_password(&req.password)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let now = Utc::now();
    let user = User {
        id: Uuid::new_v4().to_string(),
        full_name: req.full_name,
        email: req.email,
        password_hash,
        phone: req.phone,
        address: None,
        avatar: DEFAULT_AVATAR.to_string(),
        role: UserRole::User,
        created_at: now,
        updated_at: now,
    };

    state.users.create(&user).await?;

    let token = state
        .jwt_service
        .create_session_token(&user.id, &user.email)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "user signed up");

    let jar = jar.add(session_cookie(token, state.options.cookie_secure));

    Ok((StatusCode::CREATED, jar, Json(user.into())))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, CookieJar, Json<UserResponse>), ApiError> {
    let user = state
        .users
        .find_by_email(&req.email)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let is_valid = hashing::verify_password(&req.password, &user.password_hash)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    if !is_valid {
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let token = state
        .jwt_service
        .create_session_token(&user.id, &user.email)
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    let jar = jar.add(session_cookie(token, state.options.cookie_secure));

    Ok((StatusCode::OK, jar, Json(user.into())))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (StatusCode, CookieJar, Json<MessageResponse>) {
    let jar = jar.add(clear_session_cookie(state.options.cookie_secure));

    (
        StatusCode::OK,
        jar,
        Json(MessageResponse {
            message: "Logged out successfully",
        }),
    )
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if req.avatar.is_none() && req.address.is_none() {
        return Err(ApiError::validation("Nothing to update"));
    }

    let avatar_url = match &req.avatar {
        Some(data_uri) => {
            if !is_image_data_uri(data_uri) {
                return Err(ApiError::validation("Avatar must be an image data URI"));
            }
            Some(state.media.upload_data_uri(data_uri, "avatars").await?)
        }
        None => None,
    };

    state
        .users
        .update_profile(&user.id, avatar_url.as_deref(), req.address.as_deref())
        .await?;

    let updated = state
        .users
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(updated.into()))
}
