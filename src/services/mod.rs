//! Service layer for imuvpn
//!
//! - `vpn`: account, session and device operations
//! - `aggregate`: admin metrics over the stores

pub mod aggregate;
pub mod vpn;

pub use aggregate::AdminSnapshot;
pub use vpn::VpnService;
