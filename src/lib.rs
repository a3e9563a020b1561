pub mod config;
pub mod error;
pub mod mocks;
pub mod modules;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use modules::auth::auth_routes;
use modules::auth::interface::UserRepository;
use modules::book::book_routes;
use modules::book::interface::{BookingRepository, ListingRepository};
use modules::metrics::metrics_routes;
use modules::user::user_routes;
use services::jwt::JwtService;
use services::media::MediaStore;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::otp::OtpStore;
use services::rate_limit::{create_rate_limiter, RateLimitLayer};
use services::security::security_headers;
use services::sms::SmsSender;

/// Knobs that vary between deployments (and tests), read once at startup.
pub struct RuntimeOptions {
    pub cookie_secure: bool,
    pub cors_origin: Option<String>,
    pub rate_limit_burst: u32,
    pub sms_country_prefix: String,
    pub app_name: String,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            cookie_secure: false,
            cors_origin: None,
            rate_limit_burst: 60,
            sms_country_prefix: "+91".to_string(),
            app_name: "BookBay".to_string(),
        }
    }
}

/// Shared handler state. Storage and external collaborators sit behind
/// traits so the production wiring (MySQL, Redis, Twilio, Cloudinary)
/// and the in-memory test wiring build the same app.
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub listings: Arc<dyn ListingRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub otp: Arc<dyn OtpStore>,
    pub sms: Arc<dyn SmsSender>,
    pub media: Arc<dyn MediaStore>,
    pub jwt_service: JwtService,
    pub metrics: Arc<MetricsRegistry>,
    pub options: RuntimeOptions,
}

pub async fn create_app(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    let rate_limiter = create_rate_limiter(state.options.rate_limit_burst);

    // Cookies need a concrete origin for credentialed CORS; without one
    // configured, fall back to the permissive layer.
    let cors = match state.options.cors_origin.as_deref() {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new()
                .allow_origin(value)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE])
                .allow_credentials(true),
            Err(_) => {
                tracing::warn!(origin, "invalid CORS origin, falling back to permissive");
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    };

    let state = Arc::new(state);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/auth", auth_routes())
        .nest("/book", book_routes())
        .nest("/user", user_routes())
        .merge(metrics_routes())
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(1024 * 1024 * 8)) // cover images travel in the body
        .layer(RateLimitLayer::new(rate_limiter))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> &'static str {
    "BookBay Marketplace API"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
