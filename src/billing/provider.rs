//! Checkout provider
//!
//! `CheckoutProvider` is the seam to the external payment processor.
//! `StripeCheckout` talks to a Stripe-compatible `/v1/checkout/sessions`
//! endpoint; tests substitute an in-process fake.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::types::{Result, VpnError};

/// A hosted checkout session request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub customer_email: String,
    pub success_url: String,
    pub cancel_url: String,
}

/// Session created by the provider
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// External payment processor
#[async_trait::async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a subscription checkout session
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
}

/// Stripe-compatible checkout client
pub struct StripeCheckout {
    api_base: String,
    secret_key: Option<String>,
    http_client: reqwest::Client,
}

impl StripeCheckout {
    pub fn new(api_base: &str, secret_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("imuvpn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VpnError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base: api_base.trim_end_matches('/').to_string(),
            secret_key: secret_key.filter(|k| !k.is_empty()),
            http_client,
        })
    }

    /// Check if a secret key is configured
    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    fn sessions_url(&self) -> String {
        format!("{}/v1/checkout/sessions", self.api_base)
    }
}

#[async_trait::async_trait]
impl CheckoutProvider for StripeCheckout {
    async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        let secret_key = self
            .secret_key
            .as_deref()
            .ok_or_else(|| VpnError::Config("Checkout provider key not configured".into()))?;

        let form = [
            ("mode", "subscription"),
            ("line_items[0][price]", request.price_id.as_str()),
            ("line_items[0][quantity]", "1"),
            ("customer_email", request.customer_email.as_str()),
            ("success_url", request.success_url.as_str()),
            ("cancel_url", request.cancel_url.as_str()),
        ];

        let response = self
            .http_client
            .post(self.sessions_url())
            .bearer_auth(secret_key)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                // reqwest errors carry the URL, never the auth header
                warn!(error = %e, "Checkout provider unreachable");
                VpnError::Upstream(format!("Checkout provider unreachable: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| "no message".to_string());
            warn!(status = status.as_u16(), "Checkout provider rejected session");
            return Err(VpnError::Upstream(format!(
                "Checkout provider returned {}: {}",
                status.as_u16(),
                message
            )));
        }

        let session: CheckoutSession = response.json().await.map_err(|e| {
            VpnError::Upstream(format!("Invalid checkout provider response: {}", e))
        })?;

        debug!(session_id = ?session.id, "Checkout session created");
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CheckoutRequest {
        CheckoutRequest {
            price_id: "price_monthly_id_here".into(),
            customer_email: "a@example.com".into(),
            success_url: "https://imuvpn.example/ok?session_id={CHECKOUT_SESSION_ID}".into(),
            cancel_url: "https://imuvpn.example/cancel".into(),
        }
    }

    #[test]
    fn test_sessions_url_trims_slash() {
        let provider =
            StripeCheckout::new("https://api.stripe.com/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.sessions_url(),
            "https://api.stripe.com/v1/checkout/sessions"
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_config_error() {
        let provider =
            StripeCheckout::new("http://127.0.0.1:9", Some(String::new()), Duration::from_secs(1))
                .unwrap();
        assert!(!provider.is_configured());

        let result = provider.create_session(&request()).await;
        assert!(matches!(result, Err(VpnError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_upstream() {
        // nothing listens on the discard port
        let provider = StripeCheckout::new(
            "http://127.0.0.1:9",
            Some("sk_test_secret".into()),
            Duration::from_millis(500),
        )
        .unwrap();

        match provider.create_session(&request()).await {
            Err(VpnError::Upstream(msg)) => assert!(!msg.contains("sk_test_secret")),
            other => panic!("expected upstream failure, got {:?}", other.map(|s| s.url)),
        }
    }

    #[test]
    fn test_provider_error_body() {
        let body = r#"{"error":{"message":"No such price","type":"invalid_request_error"}}"#;
        let parsed: ProviderErrorBody = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message.as_deref(), Some("No such price"));
    }
}
