//! Admin aggregator
//!
//! Read-only counts over the account, session and device stores.

use serde::Serialize;

use crate::auth::{AccountStore, SessionRegistry};
use crate::provisioning::DeviceProvisioner;

/// Point-in-time counts for the admin metrics view
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct AdminSnapshot {
    /// Registered identities
    pub total_users: usize,
    /// Issued tokens, not distinct users
    pub active_sessions: usize,
    /// Devices across all identities
    pub total_devices: usize,
}

/// Count all three stores.
///
/// Callers that need a consistent view must exclude concurrent mutation
/// while this runs (see `VpnService::snapshot`).
pub fn collect(
    accounts: &AccountStore,
    sessions: &SessionRegistry,
    devices: &DeviceProvisioner,
) -> AdminSnapshot {
    AdminSnapshot {
        total_users: accounts.len(),
        active_sessions: sessions.len(),
        total_devices: devices.total(),
    }
}
