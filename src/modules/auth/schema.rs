use serde::{Deserialize, Serialize};
use validator::Validate;

use super::model::{User, UserRole};

// =============================================================================
// SIGNUP
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password length must be at least 6 characters"))]
    pub password: String,
    #[validate(length(min = 8, message = "Invalid phone number"))]
    pub phone: String,
}

// =============================================================================
// LOGIN
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// =============================================================================
// PROFILE UPDATE
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// Image as a base64 data URI; uploaded to the media host.
    pub avatar: Option<String>,
    pub address: Option<String>,
}

// =============================================================================
// RESPONSES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: Option<String>,
    pub avatar: String,
    pub role: UserRole,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            avatar: user.avatar,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
