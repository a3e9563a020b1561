use std::sync::Arc;

use bookbay::config::{environment::Config, init_db};
use bookbay::modules::auth::crud::UserCrud;
use bookbay::modules::book::crud::{BookingCrud, ListingCrud};
use bookbay::services::jwt::JwtService;
use bookbay::services::media::CloudinaryClient;
use bookbay::services::metrics::MetricsRegistry;
use bookbay::services::otp::RedisOtpStore;
use bookbay::services::sms::TwilioClient;
use bookbay::{AppState, RuntimeOptions};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookbay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load environment configuration");

    let db = init_db(&config.database_url)
        .await
        .expect("Failed to connect to MySQL");
    tracing::info!("Connected to MySQL");

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .expect("Failed to run migrations");

    let otp_store = RedisOtpStore::new(&config.redis_url, config.otp_ttl_secs)
        .expect("Failed to create Redis client");
    tracing::info!("Connected to Redis");

    let metrics = MetricsRegistry::new().expect("Failed to build metrics registry");
    let jwt_service = JwtService::new(config.jwt_secret);

    let state = AppState {
        users: Arc::new(UserCrud::new(db.clone())),
        listings: Arc::new(ListingCrud::new(db.clone())),
        bookings: Arc::new(BookingCrud::new(db)),
        otp: Arc::new(otp_store),
        sms: Arc::new(TwilioClient::new(
            config.twilio_account_sid,
            config.twilio_auth_token,
            config.twilio_from_number,
        )),
        media: Arc::new(CloudinaryClient::new(
            config.cloudinary_cloud_name,
            config.cloudinary_upload_preset,
        )),
        jwt_service,
        metrics,
        options: RuntimeOptions {
            cookie_secure: config.cookie_secure,
            cors_origin: config.cors_origin,
            rate_limit_burst: config.rate_limit_burst,
            sms_country_prefix: config.sms_country_prefix,
            app_name: config.app_name,
        },
    };

    let app = bookbay::create_app(state).await;

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    tracing::info!("Server running on http://localhost:3000");
    axum::serve(listener, app).await.unwrap();
}
