//! Authorization gate
//!
//! Two policies that never share state:
//! - user policy: bearer token resolved through the session registry
//! - admin policy: static key from process configuration, passed via X-Admin-Key
//!
//! A user session never grants admin access, and the admin key is not a
//! session token.

use super::accounts::{AccountStore, Identity};
use super::sessions::SessionRegistry;
use crate::types::{Result, VpnError};

/// Header carrying the admin key
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Extract token from Authorization header.
/// Supports "Bearer <token>" format and raw tokens.
pub fn extract_token_from_header(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?;

    if let Some(token) = header.strip_prefix("Bearer ") {
        let token = token.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    // Raw token, as older clients send it
    if !header.contains(' ') {
        let token = header.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }

    None
}

/// Resolve the caller's identity from an Authorization header value
pub fn authorize_user(
    sessions: &SessionRegistry,
    accounts: &AccountStore,
    auth_header: Option<&str>,
) -> Result<Identity> {
    let token = extract_token_from_header(auth_header).ok_or(VpnError::Unauthorized)?;
    let email = sessions.resolve(token)?;
    // Identities are never deleted, so a live session always has one
    accounts.get(&email).map_err(|_| VpnError::Unauthorized)
}

/// Admin key validator
#[derive(Debug, Clone)]
pub struct AdminKeyValidator {
    admin_key: Option<String>,
}

impl AdminKeyValidator {
    /// Create a validator. An empty key counts as unset.
    pub fn new(admin_key: Option<String>) -> Self {
        Self {
            admin_key: admin_key.filter(|k| !k.is_empty()),
        }
    }

    /// Check if an admin key is configured
    pub fn is_configured(&self) -> bool {
        self.admin_key.is_some()
    }

    /// Authorize a supplied key.
    ///
    /// Denies when no key is configured, whatever the caller sends.
    pub fn authorize(&self, supplied: Option<&str>) -> Result<()> {
        match (&self.admin_key, supplied) {
            (Some(expected), Some(key)) if constant_time_compare(key, expected) => Ok(()),
            _ => Err(VpnError::AdminUnauthorized),
        }
    }
}

/// Constant-time string comparison to prevent timing attacks
pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
