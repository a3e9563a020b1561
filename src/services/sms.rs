use async_trait::async_trait;
use std::time::Duration;

use crate::error::ApiError;

/// Transactional SMS dispatch. Best-effort: a failure here must never
/// roll back state the caller has already persisted.
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send(&self, to_e164: &str, body: &str) -> Result<(), ApiError>;
}

/// Normalizes a stored phone number to E.164. Numbers without a leading
/// `+` get the configured country prefix.
pub fn to_e164(phone: &str, default_prefix: &str) -> String {
    let cleaned: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '(' && *c != ')')
        .collect();

    if cleaned.starts_with('+') {
        cleaned
    } else {
        format!("{}{}", default_prefix, cleaned)
    }
}

/// Twilio REST API client
/// Handles dispatch of transactional SMS messages.
pub struct TwilioClient {
    client: reqwest::Client,
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
}

impl TwilioClient {
    pub fn new(account_sid: String, auth_token: String, from_number: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            account_sid,
            auth_token,
            from_number,
            base_url: "https://api.twilio.com".to_string(),
        }
    }
}

#[async_trait]
impl SmsSender for TwilioClient {
    async fn send(&self, to_e164: &str, body: &str) -> Result<(), ApiError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", to_e164),
                ("From", self.from_number.as_str()),
                ("Body", body),
            ])
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| ApiError::dependency(format!("SMS gateway: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::dependency(format!(
                "SMS gateway returned status: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
