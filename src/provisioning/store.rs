//! Device store
//!
//! Per-identity device lists in insertion order.

use dashmap::DashMap;
use serde::Serialize;

/// A provisioned device as returned by list-devices
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeviceRecord {
    pub name: String,
    pub location: String,
    pub config: String,
}

/// Email -> device list
pub struct DeviceStore {
    devices: DashMap<String, Vec<DeviceRecord>>,
}

impl DeviceStore {
    pub fn new() -> Self {
        Self {
            devices: DashMap::new(),
        }
    }

    /// Append a record to the owner's list, creating the list on first use
    pub fn append(&self, email: &str, record: DeviceRecord) {
        self.devices
            .entry(email.to_string())
            .or_default()
            .push(record);
    }

    /// Devices for `email`, oldest first. Empty if none.
    pub fn list_for(&self, email: &str) -> Vec<DeviceRecord> {
        self.devices
            .get(email)
            .map(|list| list.clone())
            .unwrap_or_default()
    }

    /// Devices across all identities
    pub fn total(&self) -> usize {
        self.devices.iter().map(|entry| entry.value().len()).sum()
    }
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> DeviceRecord {
        DeviceRecord {
            name: name.to_string(),
            location: "sgp-1".to_string(),
            config: String::new(),
        }
    }

    #[test]
    fn test_insertion_order() {
        let store = DeviceStore::new();
        store.append("alice@example.com", record("laptop"));
        store.append("alice@example.com", record("phone"));
        store.append("alice@example.com", record("laptop"));

        let names: Vec<_> = store
            .list_for("alice@example.com")
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, vec!["laptop", "phone", "laptop"]);
    }

    #[test]
    fn test_unknown_owner_is_empty() {
        let store = DeviceStore::new();
        assert!(store.list_for("nobody@example.com").is_empty());
        assert_eq!(store.total(), 0);
    }

    #[test]
    fn test_total_sums_all_owners() {
        let store = DeviceStore::new();
        store.append("a@example.com", record("one"));
        store.append("b@example.com", record("two"));
        store.append("b@example.com", record("three"));
        assert_eq!(store.total(), 3);
    }
}
