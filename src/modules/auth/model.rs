use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Placeholder shown until the user uploads an avatar.
pub const DEFAULT_AVATAR: &str = "https://cdn-icons-png.flaticon.com/128/3177/3177440.png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: Option<String>,
    pub avatar: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
