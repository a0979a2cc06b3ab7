//! HTTP routes for imuvpn

pub mod admin;
pub mod auth_routes;
pub mod billing;
pub mod health;
pub mod response;
pub mod wireguard;

pub use admin::handle_metrics;
pub use auth_routes::{handle_login, handle_me, handle_signup};
pub use billing::handle_checkout;
pub use health::{health_check, service_info, version_info};
pub use response::{cors_preflight, error_response, json_response, not_found, BoxBody};
pub use wireguard::{handle_list, handle_provision};
