use async_trait::async_trait;
use sqlx::{MySql, Pool};

use super::interface::{Result, UserRepository};
use super::model::User;

pub struct UserCrud {
    pool: Pool<MySql>,
}

impl UserCrud {
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for UserCrud {
    async fn create(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, full_name, email, password_hash, phone, address, avatar, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.full_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(&user.avatar)
        .bind(user.role)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(Into::into)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }

    async fn full_name_exists(&self, full_name: &str) -> Result<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE full_name = ?")
            .bind(full_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }

    async fn update_profile(
        &self,
        id: &str,
        avatar: Option<&str>,
        address: Option<&str>,
    ) -> Result<()> {
        if let Some(avatar) = avatar {
            sqlx::query("UPDATE users SET avatar = ?, updated_at = NOW() WHERE id = ?")
                .bind(avatar)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }

        if let Some(address) = address {
            sqlx::query("UPDATE users SET address = ?, updated_at = NOW() WHERE id = ?")
                .bind(address)
                .bind(id)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }
}
