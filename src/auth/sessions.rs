//! Session registry
//!
//! Maps opaque bearer tokens to the email that logged in. A user may hold any
//! number of tokens at once. Tokens never expire and there is no logout.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::Rng;
use tracing::debug;

use crate::types::{Result, VpnError};

/// Random bytes per token (128 bits, 32 hex chars)
pub const TOKEN_BYTES: usize = 16;

/// An issued session
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub email: String,
    /// Unix seconds, informational only
    pub issued_at: i64,
}

/// Token -> session map with concurrent access
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Mint a token for `email` and record it.
    ///
    /// The token only lands in a vacant slot; a collision with a live token
    /// draws a fresh one.
    pub fn issue(&self, email: &str) -> String {
        loop {
            let token = generate_token();
            if let Entry::Vacant(slot) = self.sessions.entry(token.clone()) {
                slot.insert(Session {
                    token: token.clone(),
                    email: email.to_string(),
                    issued_at: chrono::Utc::now().timestamp(),
                });
                debug!(email = %email, "Session issued");
                return token;
            }
        }
    }

    /// Resolve a token to the owning email
    pub fn resolve(&self, token: &str) -> Result<String> {
        if token.is_empty() {
            return Err(VpnError::Unauthorized);
        }
        self.sessions
            .get(token)
            .map(|s| s.email.clone())
            .ok_or(VpnError::Unauthorized)
    }

    /// Number of issued tokens (not distinct users)
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate a random hex token from the thread-local CSPRNG
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; TOKEN_BYTES] = rng.gen();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_issue_then_resolve() {
        let registry = SessionRegistry::new();
        let token = registry.issue("alice@example.com");
        assert_eq!(registry.resolve(&token).unwrap(), "alice@example.com");
    }

    #[test]
    fn test_token_format() {
        let registry = SessionRegistry::new();
        let token = registry.issue("alice@example.com");
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_multiple_tokens_per_email() {
        let registry = SessionRegistry::new();
        let t1 = registry.issue("alice@example.com");
        let t2 = registry.issue("alice@example.com");
        assert_ne!(t1, t2);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve(&t1).unwrap(), registry.resolve(&t2).unwrap());
    }

    #[test]
    fn test_unknown_and_empty_tokens_rejected() {
        let registry = SessionRegistry::new();
        registry.issue("alice@example.com");
        assert!(matches!(registry.resolve(""), Err(VpnError::Unauthorized)));
        assert!(matches!(
            registry.resolve("00000000000000000000000000000000"),
            Err(VpnError::Unauthorized)
        ));
    }

    #[test]
    fn test_tokens_unique_across_many_issues() {
        let registry = SessionRegistry::new();
        let tokens: HashSet<String> = (0..1000)
            .map(|i| registry.issue(&format!("user{}@example.com", i % 7)))
            .collect();
        assert_eq!(tokens.len(), 1000);
        assert_eq!(registry.len(), 1000);
    }
}
