//! Device provisioning engine
//!
//! Each request produces a fresh key pair, a virtual address in 10.8.0.0/16
//! and a rendered WireGuard profile, and appends the result to the caller's
//! device list. Devices are never renamed, rotated or removed.

pub mod keys;
pub mod profile;
pub mod store;

pub use keys::{KeyPair, VirtualAddress};
pub use profile::{ProfileTemplate, DEFAULT_PROFILE_DOMAIN};
pub use store::{DeviceRecord, DeviceStore};

use tracing::debug;

/// Result of a provisioning request
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    pub device_name: String,
    pub location: String,
    pub keys: KeyPair,
    pub address: VirtualAddress,
    pub config: String,
}

/// Provisioning engine bound to a device store and a profile template
pub struct DeviceProvisioner {
    template: ProfileTemplate,
    devices: DeviceStore,
}

impl DeviceProvisioner {
    pub fn new(template: ProfileTemplate) -> Self {
        Self {
            template,
            devices: DeviceStore::new(),
        }
    }

    /// Provision a device for `email` and record it
    pub fn provision(&self, email: &str, device_name: &str, location: &str) -> DeviceProfile {
        let keys = KeyPair::generate();
        let address = VirtualAddress::allocate();
        let config = self.template.render(&keys, &address, location);

        self.devices.append(
            email,
            DeviceRecord {
                name: device_name.to_string(),
                location: location.to_string(),
                config: config.clone(),
            },
        );

        debug!(
            email = %email,
            device = %device_name,
            location = %location,
            address = %address,
            "Device provisioned"
        );

        DeviceProfile {
            device_name: device_name.to_string(),
            location: location.to_string(),
            keys,
            address,
            config,
        }
    }

    /// Devices for `email`, oldest first
    pub fn list_for(&self, email: &str) -> Vec<DeviceRecord> {
        self.devices.list_for(email)
    }

    /// Devices across all identities
    pub fn total(&self) -> usize {
        self.devices.total()
    }
}

impl Default for DeviceProvisioner {
    fn default() -> Self {
        Self::new(ProfileTemplate::default())
    }
}
