//! Resend Email Notifier Implementation
//!
//! Sends verification emails through the Resend HTTP API
//! (`POST /emails` with a bearer API key).
//!
//! ## Features
//!
//! - Retry with exponential backoff on rate limiting and server errors
//! - Provider error messages surfaced to the caller
//! - Recipient masking in logs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use ev_core::services::verification::EmailNotifierTrait;
use ev_shared::utils::email::mask_email;

use super::template::render_verification_email;
use crate::config::NotifierConfig;
use crate::InfrastructureError;

/// Default Resend API endpoint
pub const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

/// Resend notifier configuration
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// Resend API key
    pub api_key: String,
    /// Sender address (must belong to a verified domain)
    pub from_address: String,
    /// API base URL
    pub api_base_url: String,
    /// Maximum attempts per message
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl ResendConfig {
    /// Build from the generic notifier configuration
    pub fn from_notifier_config(config: &NotifierConfig) -> Result<Self, InfrastructureError> {
        if config.api_key.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "Resend API key is not set".to_string(),
            ));
        }
        if config.from_address.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "Sender address is not set".to_string(),
            ));
        }

        Ok(Self {
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            max_retries: 3,
            retry_delay_ms: 500,
            request_timeout_secs: config.request_timeout_secs,
        })
    }
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Outcome of one HTTP attempt
enum AttemptError {
    /// Worth another attempt after backing off
    Retryable(String),
    /// Final
    Permanent(String),
}

/// Resend email notifier
pub struct ResendEmailNotifier {
    client: reqwest::Client,
    config: ResendConfig,
}

impl ResendEmailNotifier {
    /// Create a new Resend notifier
    pub fn new(config: ResendConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            from = %config.from_address,
            "Resend email notifier initialized"
        );

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.config.api_base_url)
    }

    async fn send_once(&self, request: &SendEmailRequest<'_>) -> Result<String, AttemptError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    AttemptError::Retryable(format!("Request failed: {}", e))
                } else {
                    AttemptError::Permanent(format!("Request failed: {}", e))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            let body: SendEmailResponse = response
                .json()
                .await
                .map_err(|e| AttemptError::Permanent(format!("Invalid response body: {}", e)))?;
            return Ok(body.id);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        let reason = format!("Resend API returned {}: {}", status.as_u16(), message);

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            Err(AttemptError::Retryable(reason))
        } else {
            Err(AttemptError::Permanent(reason))
        }
    }

    /// Send with retry logic
    async fn send_with_retry(&self, to: &str, request: &SendEmailRequest<'_>) -> Result<String, InfrastructureError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(
                attempt = attempts,
                max_attempts = max_attempts,
                email = %mask_email(to),
                "Sending verification email via Resend"
            );

            match self.send_once(request).await {
                Ok(message_id) => {
                    info!(
                        provider = "resend",
                        email = %mask_email(to),
                        message_id = %message_id,
                        "Verification email sent"
                    );
                    return Ok(message_id);
                }
                Err(AttemptError::Permanent(reason)) => {
                    error!(provider = "resend", error = %reason, "Email sending failed");
                    return Err(InfrastructureError::Email(reason));
                }
                Err(AttemptError::Retryable(reason)) => {
                    if attempts >= max_attempts {
                        error!(
                            provider = "resend",
                            attempts = attempts,
                            error = %reason,
                            "Email sending failed after retries"
                        );
                        return Err(InfrastructureError::Email(format!(
                            "Failed to send email after {} attempts: {}",
                            attempts, reason
                        )));
                    }
                    warn!(
                        provider = "resend",
                        error = %reason,
                        retry_in_ms = delay.as_millis() as u64,
                        "Retrying email delivery"
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
        }
    }
}

#[async_trait]
impl EmailNotifierTrait for ResendEmailNotifier {
    async fn send_verification_code(
        &self,
        email: &str,
        code: &str,
        expire_minutes: i64,
    ) -> Result<String, String> {
        let rendered = render_verification_email(code, expire_minutes);
        let request = SendEmailRequest {
            from: &self.config.from_address,
            to: [email],
            subject: &rendered.subject,
            html: &rendered.html,
            text: &rendered.text,
        };

        self.send_with_retry(email, &request)
            .await
            .map_err(|e| e.to_string())
    }

    fn provider_name(&self) -> &str {
        "Resend"
    }
}
