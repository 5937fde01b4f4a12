//! Customer notifications.
//!
//! Order and membership events produce short customer-facing messages built
//! by [`templates`]. Delivery goes through the [`Notifier`] trait: the
//! default [`LogNotifier`] writes to the log, while [`WebhookNotifier`]
//! hands messages to an external SMS gateway over HTTP.

pub mod templates;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The recipient phone number is not deliverable.
    #[error("invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway returned a non-2xx response.
    #[error("unexpected response from gateway: {0}")]
    UnexpectedResponse(String),
}

/// Basic deliverability check for Indian mobile numbers: an optional `+91`
/// prefix followed by ten digits starting with 6-9. Whitespace is ignored.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(|c| !c.is_whitespace()).collect();
    let national = digits.strip_prefix("+91").unwrap_or(&digits);

    national.len() == 10
        && national.starts_with(['6', '7', '8', '9'])
        && national.chars().all(|c| c.is_ascii_digit())
}

/// Delivery channel for customer-facing messages.
#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message` to the phone number `to`.
    async fn send(&self, to: &str, message: &str) -> Result<(), NotifyError>;
}

/// Logs outgoing messages instead of delivering them. Used in development
/// and in tests.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(to, message, "notification (log only)");

        Ok(())
    }
}

/// Configuration for an HTTP SMS gateway.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Gateway endpoint, e.g. `"https://gateway.example/v1/messages"`.
    pub endpoint: String,

    /// Bearer token presented to the gateway.
    pub token: String,
}

/// Delivers messages to an HTTP SMS gateway as a JSON POST.
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    config: WebhookConfig,
    http: Client,
}

impl WebhookNotifier {
    /// Create a new notifier from the given configuration.
    #[must_use]
    pub fn new(config: WebhookConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send(&self, to: &str, message: &str) -> Result<(), NotifyError> {
        if !is_valid_phone(to) {
            return Err(NotifyError::InvalidPhoneNumber(to.to_string()));
        }

        let body = serde_json::json!({ "to": to, "message": message });

        let response = self
            .http
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.token)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(NotifyError::UnexpectedResponse(format!(
                "send failed with status {status}: {text}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_indian_mobile_numbers_are_accepted() {
        assert!(is_valid_phone("+919876543210"));
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("+91 98765 43210"));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("5876543210"));
        assert!(!is_valid_phone("+9198765432100"));
        assert!(!is_valid_phone("98765abcde"));
    }
}
