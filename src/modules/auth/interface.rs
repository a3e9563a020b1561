use async_trait::async_trait;

use super::model::User;
use crate::error::ApiError;

pub type Result<T> = std::result::Result<T, ApiError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn email_exists(&self, email: &str) -> Result<bool>;
    async fn full_name_exists(&self, full_name: &str) -> Result<bool>;
    /// `Some` fields are written, `None` fields are left untouched.
    async fn update_profile(
        &self,
        id: &str,
        avatar: Option<&str>,
        address: Option<&str>,
    ) -> Result<()>;
}
