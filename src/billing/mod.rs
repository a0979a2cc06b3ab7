//! Checkout bridge
//!
//! Maps a client plan identifier to an external price id and asks the
//! checkout provider for a hosted session URL. Unknown plans never reach
//! the provider.

pub mod plans;
pub mod provider;

pub use plans::{Plan, PlanCatalog};
pub use provider::{CheckoutProvider, CheckoutRequest, CheckoutSession, StripeCheckout};

use std::sync::Arc;

use tracing::info;

use crate::auth::Identity;
use crate::types::{Result, VpnError};

/// Placeholder the provider substitutes with the session id
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

pub struct CheckoutService {
    catalog: PlanCatalog,
    provider: Arc<dyn CheckoutProvider>,
    success_url: String,
    cancel_url: String,
}

impl CheckoutService {
    pub fn new(
        catalog: PlanCatalog,
        provider: Arc<dyn CheckoutProvider>,
        success_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            provider,
            success_url: success_url.into(),
            cancel_url: cancel_url.into(),
        }
    }

    /// Start a subscription checkout for `identity`, returning the hosted URL
    pub async fn checkout(&self, identity: &Identity, plan_id: &str) -> Result<String> {
        let plan = Plan::from_id(plan_id)
            .ok_or_else(|| VpnError::UnknownPlan(plan_id.to_string()))?;

        let request = CheckoutRequest {
            price_id: self.catalog.price_for(plan).to_string(),
            customer_email: identity.email.clone(),
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
        };

        let session = self.provider.create_session(&request).await?;
        let url = session
            .url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| VpnError::Upstream("Checkout provider returned no url".into()))?;

        info!(email = %identity.email, plan = %plan, "Checkout session started");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingProvider {
        calls: AtomicUsize,
        last: Mutex<Option<CheckoutRequest>>,
        url: Option<String>,
    }

    #[async_trait::async_trait]
    impl CheckoutProvider for RecordingProvider {
        async fn create_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());
            Ok(CheckoutSession {
                id: Some("cs_test_1".into()),
                url: self.url.clone(),
            })
        }
    }

    fn identity() -> Identity {
        Identity {
            email: "a@example.com".into(),
            secret: "pw".into(),
            active: true,
        }
    }

    fn service(provider: Arc<RecordingProvider>) -> CheckoutService {
        CheckoutService::new(
            PlanCatalog::new("price_m", "price_y", "price_f"),
            provider,
            "https://imuvpn.example/ok?session_id={CHECKOUT_SESSION_ID}",
            "https://imuvpn.example/cancel",
        )
    }

    #[tokio::test]
    async fn test_unknown_plan_makes_no_call() {
        let provider = Arc::new(RecordingProvider::default());
        let checkout = service(provider.clone());

        let result = checkout.checkout(&identity(), "price_lifetime").await;
        assert!(matches!(result, Err(VpnError::UnknownPlan(_))));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_known_plan_maps_price() {
        let provider = Arc::new(RecordingProvider {
            url: Some("https://checkout.example/cs_test_1".into()),
            ..Default::default()
        });
        let checkout = service(provider.clone());

        let url = checkout.checkout(&identity(), "price_yearly").await.unwrap();
        assert_eq!(url, "https://checkout.example/cs_test_1");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        let sent = provider.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.price_id, "price_y");
        assert_eq!(sent.customer_email, "a@example.com");
        assert!(sent.success_url.contains(SESSION_ID_PLACEHOLDER));
        assert_eq!(sent.cancel_url, "https://imuvpn.example/cancel");
    }

    #[tokio::test]
    async fn test_missing_url_is_upstream_failure() {
        let provider = Arc::new(RecordingProvider::default());
        let checkout = service(provider);

        let result = checkout.checkout(&identity(), "price_monthly").await;
        assert!(matches!(result, Err(VpnError::Upstream(_))));
    }
}
