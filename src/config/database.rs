use sqlx::{mysql::MySqlPoolOptions, MySql, Pool};

pub type DbPool = Pool<MySql>;

pub async fn init_db(database_url: &str) -> Result<DbPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}
