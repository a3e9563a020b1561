use std::env;

/// Environment configuration
/// Loads and validates environment variables once at startup; everything
/// downstream receives plain values instead of reading the process env.
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub jwt_secret: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_from_number: String,
    pub cloudinary_cloud_name: String,
    pub cloudinary_upload_preset: String,
    pub sms_country_prefix: String,
    pub app_name: String,
    pub otp_ttl_secs: u64,
    pub cookie_secure: bool,
    pub cors_origin: Option<String>,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".to_string());

        let jwt_secret = env::var("JWT_SECRET").map_err(|_| "JWT_SECRET must be set".to_string())?;

        let twilio_account_sid = env::var("TWILIO_ACCOUNT_SID")
            .map_err(|_| "TWILIO_ACCOUNT_SID must be set".to_string())?;

        let twilio_auth_token = env::var("TWILIO_AUTH_TOKEN")
            .map_err(|_| "TWILIO_AUTH_TOKEN must be set".to_string())?;

        let twilio_from_number = env::var("TWILIO_PHONE_NUMBER")
            .map_err(|_| "TWILIO_PHONE_NUMBER must be set".to_string())?;

        let cloudinary_cloud_name = env::var("CLOUDINARY_CLOUD_NAME")
            .map_err(|_| "CLOUDINARY_CLOUD_NAME must be set".to_string())?;

        let cloudinary_upload_preset = env::var("CLOUDINARY_UPLOAD_PRESET")
            .map_err(|_| "CLOUDINARY_UPLOAD_PRESET must be set".to_string())?;

        let sms_country_prefix =
            env::var("SMS_COUNTRY_PREFIX").unwrap_or_else(|_| "+91".to_string());

        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "BookBay".to_string());

        let otp_ttl_secs = env::var("OTP_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(300);

        // Cookies go Secure everywhere except local dev.
        let cookie_secure = env::var("APP_ENV")
            .map(|v| v != "development")
            .unwrap_or(false);

        let cors_origin = env::var("CORS_ORIGIN").ok();

        let rate_limit_burst = env::var("RATE_LIMIT_BURST")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        Ok(Self {
            database_url,
            redis_url,
            jwt_secret,
            twilio_account_sid,
            twilio_auth_token,
            twilio_from_number,
            cloudinary_cloud_name,
            cloudinary_upload_preset,
            sms_country_prefix,
            app_name,
            otp_ttl_secs,
            cookie_secure,
            cors_origin,
            rate_limit_burst,
        })
    }
}
