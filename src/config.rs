//! Configuration for imuvpn
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use uuid::Uuid;

use crate::billing::{plans, PlanCatalog, SESSION_ID_PLACEHOLDER};
use crate::provisioning::DEFAULT_PROFILE_DOMAIN;

/// imuvpn - account, device provisioning and checkout API for imuVPN
#[derive(Parser, Debug, Clone)]
#[command(name = "imuvpn")]
#[command(about = "Account, WireGuard provisioning and checkout API for imuVPN")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:8000")]
    pub listen: SocketAddr,

    /// Static key for the admin metrics view.
    /// Unset means admin access is always denied.
    #[arg(long, env = "ADMIN_KEY")]
    pub admin_key: Option<String>,

    /// Domain used in device endpoints (wg.<location>.<domain>)
    #[arg(long, env = "PROFILE_DOMAIN", default_value = DEFAULT_PROFILE_DOMAIN)]
    pub profile_domain: String,

    /// Checkout provider configuration
    #[command(flatten)]
    pub stripe: StripeArgs,

    /// Checkout client timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "10000")]
    pub request_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit JSON log lines
    #[arg(long, env = "LOG_JSON", default_value = "false")]
    pub log_json: bool,
}

/// Checkout provider configuration
#[derive(Parser, Debug, Clone)]
pub struct StripeArgs {
    /// Provider secret key (optional; checkout fails closed without it)
    #[arg(long, env = "STRIPE_SECRET_KEY")]
    pub stripe_secret_key: Option<String>,

    /// Provider API base URL
    #[arg(long, env = "STRIPE_API_BASE", default_value = "https://api.stripe.com")]
    pub stripe_api_base: String,

    /// Price id for the monthly plan
    #[arg(long, env = "STRIPE_PRICE_MONTHLY", default_value = plans::DEFAULT_MONTHLY_PRICE)]
    pub stripe_price_monthly: String,

    /// Price id for the yearly plan
    #[arg(long, env = "STRIPE_PRICE_YEARLY", default_value = plans::DEFAULT_YEARLY_PRICE)]
    pub stripe_price_yearly: String,

    /// Price id for the family plan
    #[arg(long, env = "STRIPE_PRICE_FAMILY", default_value = plans::DEFAULT_FAMILY_PRICE)]
    pub stripe_price_family: String,

    /// Redirect after a completed checkout. Must carry {CHECKOUT_SESSION_ID}.
    #[arg(
        long,
        env = "CHECKOUT_SUCCESS_URL",
        default_value = "https://imuvpn.example/billing/success?session_id={CHECKOUT_SESSION_ID}"
    )]
    pub checkout_success_url: String,

    /// Redirect after an abandoned checkout
    #[arg(
        long,
        env = "CHECKOUT_CANCEL_URL",
        default_value = "https://imuvpn.example/billing/cancel"
    )]
    pub checkout_cancel_url: String,
}

impl Args {
    /// Plan -> price id mapping
    pub fn plan_catalog(&self) -> PlanCatalog {
        PlanCatalog::new(
            self.stripe.stripe_price_monthly.clone(),
            self.stripe.stripe_price_yearly.clone(),
            self.stripe.stripe_price_family.clone(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Admin key, treating an empty value as unset
    pub fn admin_key(&self) -> Option<&str> {
        self.admin_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Provider key, treating an empty value as unset
    pub fn stripe_secret_key(&self) -> Option<&str> {
        self.stripe
            .stripe_secret_key
            .as_deref()
            .filter(|k| !k.is_empty())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.profile_domain.trim().is_empty() {
            return Err("PROFILE_DOMAIN must not be empty".to_string());
        }

        if !self
            .stripe
            .checkout_success_url
            .contains(SESSION_ID_PLACEHOLDER)
        {
            return Err(format!(
                "CHECKOUT_SUCCESS_URL must contain the {} placeholder",
                SESSION_ID_PLACEHOLDER
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err("REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["imuvpn"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_override_flags() {
        let args = parse(&[
            "--listen",
            "127.0.0.1:9000",
            "--profile-domain",
            "vpn.test",
            "--stripe-price-family",
            "price_fam_live",
        ]);
        assert_eq!(args.listen.port(), 9000);
        assert_eq!(args.profile_domain, "vpn.test");
        assert_eq!(args.plan_catalog().family, "price_fam_live");
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_success_url_needs_placeholder() {
        let args = parse(&["--checkout-success-url", "https://imuvpn.example/done"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let args = parse(&["--request-timeout-ms", "0"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_empty_domain_rejected() {
        let args = parse(&["--profile-domain", " "]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_empty_admin_key_is_unset() {
        let args = parse(&["--admin-key", ""]);
        assert_eq!(args.admin_key(), None);

        let args = parse(&["--admin-key", "s3cret"]);
        assert_eq!(args.admin_key(), Some("s3cret"));
    }
}
