//! Account store
//!
//! In-memory registry of identities keyed by email. Emails are stored exactly
//! as supplied: no case folding or trimming, so `A@x.io` and `a@x.io` are two
//! different accounts.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use super::gate::constant_time_compare;
use crate::types::{Result, VpnError};

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    /// Account key, unique within the store
    pub email: String,

    /// Credential secret. Stored as supplied (no hashing).
    #[serde(skip_serializing)]
    pub secret: String,

    /// Set on creation and never changed. Reported, not enforced.
    pub active: bool,
}

/// Account store with concurrent access
pub struct AccountStore {
    accounts: DashMap<String, Identity>,
}

impl AccountStore {
    /// Create an empty account store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Register a new identity.
    ///
    /// The vacancy check and the insert happen under the same shard lock, so
    /// two concurrent registrations of one email cannot both succeed.
    pub fn register(&self, email: &str, secret: &str) -> Result<Identity> {
        match self.accounts.entry(email.to_string()) {
            Entry::Occupied(_) => Err(VpnError::Conflict),
            Entry::Vacant(slot) => {
                let identity = Identity {
                    email: email.to_string(),
                    secret: secret.to_string(),
                    active: true,
                };
                slot.insert(identity.clone());
                debug!(email = %email, "Identity registered");
                Ok(identity)
            }
        }
    }

    /// Check a credential pair.
    ///
    /// Unknown email and wrong secret produce the same error.
    pub fn verify(&self, email: &str, secret: &str) -> Result<Identity> {
        let identity = self
            .accounts
            .get(email)
            .ok_or(VpnError::InvalidCredentials)?;

        if constant_time_compare(&identity.secret, secret) {
            Ok(identity.clone())
        } else {
            Err(VpnError::InvalidCredentials)
        }
    }

    /// Look up an identity by email
    pub fn get(&self, email: &str) -> Result<Identity> {
        self.accounts
            .get(email)
            .map(|i| i.clone())
            .ok_or_else(|| VpnError::NotFound(format!("identity {}", email)))
    }

    /// Number of registered identities
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl Default for AccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_register_and_verify() {
        let store = AccountStore::new();
        let identity = store.register("alice@example.com", "hunter2").unwrap();
        assert!(identity.active);

        let verified = store.verify("alice@example.com", "hunter2").unwrap();
        assert_eq!(verified.email, "alice@example.com");
    }

    #[test]
    fn test_duplicate_email_keeps_original_secret() {
        let store = AccountStore::new();
        store.register("alice@example.com", "first").unwrap();

        let err = store.register("alice@example.com", "second").unwrap_err();
        assert!(matches!(err, VpnError::Conflict));

        assert!(store.verify("alice@example.com", "first").is_ok());
        assert!(store.verify("alice@example.com", "second").is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_emails_are_case_sensitive() {
        let store = AccountStore::new();
        store.register("Bob@example.com", "pw").unwrap();
        store.register("bob@example.com", "pw").unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_verify_failures_are_indistinguishable() {
        let store = AccountStore::new();
        store.register("carol@example.com", "secret").unwrap();

        let unknown = store.verify("nobody@example.com", "secret").unwrap_err();
        let wrong = store.verify("carol@example.com", "Secret").unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(wrong, VpnError::InvalidCredentials));
    }

    #[test]
    fn test_get_unknown_is_not_found() {
        let store = AccountStore::new();
        assert!(matches!(store.get("ghost@example.com"), Err(VpnError::NotFound(_))));
    }

    #[test]
    fn test_concurrent_registration_single_winner() {
        let store = Arc::new(AccountStore::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.register("race@example.com", &format!("pw-{}", i)).is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        assert_eq!(winners, 1);
        assert_eq!(store.len(), 1);
    }
}
