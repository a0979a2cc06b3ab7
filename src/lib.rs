//! imuvpn - account, device provisioning and checkout API for imuVPN
//!
//! ## Services
//!
//! - **Accounts**: email + secret registration and login
//! - **Sessions**: opaque bearer tokens, never expiring
//! - **Provisioning**: per-device key pairs, virtual addresses and WireGuard profiles
//! - **Admin**: aggregate counts behind a static admin key
//! - **Billing**: subscription checkout through a Stripe-compatible provider

pub mod auth;
pub mod billing;
pub mod config;
pub mod provisioning;
pub mod routes;
pub mod server;
pub mod services;
pub mod types;

pub use config::Args;
pub use server::{run, serve, AppState};
pub use types::{Result, VpnError};
