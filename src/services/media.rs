use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;

use crate::error::ApiError;

lazy_static! {
    static ref IMAGE_DATA_URI: Regex =
        Regex::new(r"^data:image/(png|jpe?g|webp|gif);base64,[A-Za-z0-9+/=\r\n]+$").unwrap();
}

/// External media host. Uploads return a public URL; the image bytes are
/// never stored locally.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload_data_uri(&self, data_uri: &str, folder: &str) -> Result<String, ApiError>;
}

pub fn is_image_data_uri(value: &str) -> bool {
    IMAGE_DATA_URI.is_match(value)
}

pub fn bytes_to_data_uri(bytes: &[u8], content_type: &str) -> String {
    format!("data:{};base64,{}", content_type, BASE64.encode(bytes))
}

/// Cloudinary upload API client
/// Uses an unsigned upload preset, so no per-request signature is needed.
pub struct CloudinaryClient {
    client: reqwest::Client,
    cloud_name: String,
    upload_preset: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

impl CloudinaryClient {
    pub fn new(cloud_name: String, upload_preset: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name,
            upload_preset,
            base_url: "https://api.cloudinary.com".to_string(),
        }
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload_data_uri(&self, data_uri: &str, folder: &str) -> Result<String, ApiError> {
        let url = format!("{}/v1_1/{}/image/upload", self.base_url, self.cloud_name);

        let response = self
            .client
            .post(&url)
            .form(&[
                ("file", data_uri),
                ("upload_preset", self.upload_preset.as_str()),
                ("folder", folder),
            ])
            .timeout(Duration::from_secs(30))
            .send()
            .await
            .map_err(|e| ApiError::dependency(format!("Media host: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::dependency(format!(
                "Media host returned status: {}",
                response.status()
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| ApiError::dependency(format!("Media host: {}", e)))?;

        Ok(upload.secure_url)
    }
}
