//! VPN account service
//!
//! Owns the account store, session registry and provisioning engine and
//! exposes the logical operations behind the HTTP routes.
//!
//! Consistency: every mutation holds a shared guard on `snapshot_gate` while it
//! writes, and `snapshot()` takes the exclusive guard. Mutations on different
//! keys still proceed in parallel; the admin view never observes a half-applied
//! batch of counts.

use parking_lot::RwLock;
use tracing::{info, warn};

use super::aggregate::{self, AdminSnapshot};
use crate::auth::{authorize_user, AccountStore, AdminKeyValidator, Identity, SessionRegistry};
use crate::provisioning::{DeviceProfile, DeviceProvisioner, DeviceRecord, ProfileTemplate};
use crate::types::{Result, VpnError};

pub struct VpnService {
    accounts: AccountStore,
    sessions: SessionRegistry,
    provisioner: DeviceProvisioner,
    admin: AdminKeyValidator,
    snapshot_gate: RwLock<()>,
}

impl VpnService {
    pub fn new(template: ProfileTemplate, admin_key: Option<String>) -> Self {
        Self {
            accounts: AccountStore::new(),
            sessions: SessionRegistry::new(),
            provisioner: DeviceProvisioner::new(template),
            admin: AdminKeyValidator::new(admin_key),
            snapshot_gate: RwLock::new(()),
        }
    }

    /// Whether the admin policy can ever succeed
    pub fn admin_configured(&self) -> bool {
        self.admin.is_configured()
    }

    /// Create an account
    pub fn signup(&self, email: &str, password: &str) -> Result<Identity> {
        require_field("email", email)?;
        require_field("password", password)?;

        let _guard = self.snapshot_gate.read();
        match self.accounts.register(email, password) {
            Ok(identity) => {
                info!(email = %email, "Signup successful");
                Ok(identity)
            }
            Err(VpnError::Conflict) => {
                warn!(email = %email, "Signup rejected - email already registered");
                Err(VpnError::Conflict)
            }
            Err(e) => {
                warn!(email = %email, error = %e, "Signup failed");
                Err(e)
            }
        }
    }

    /// Check credentials and mint a session token
    pub fn login(&self, email: &str, password: &str) -> Result<String> {
        require_field("email", email)?;
        require_field("password", password)?;

        let identity = self.accounts.verify(email, password).map_err(|e| {
            warn!(email = %email, "Login failed - invalid credentials");
            e
        })?;

        let _guard = self.snapshot_gate.read();
        let token = self.sessions.issue(&identity.email);
        info!(email = %identity.email, "Login successful");
        Ok(token)
    }

    /// User policy: resolve the Authorization header to an identity
    pub fn authorize(&self, auth_header: Option<&str>) -> Result<Identity> {
        authorize_user(&self.sessions, &self.accounts, auth_header)
    }

    /// Identity behind a session
    pub fn whoami(&self, auth_header: Option<&str>) -> Result<Identity> {
        self.authorize(auth_header)
    }

    /// Provision a device for the caller
    pub fn provision_device(
        &self,
        auth_header: Option<&str>,
        device_name: &str,
        location: &str,
    ) -> Result<DeviceProfile> {
        let identity = self.authorize(auth_header)?;
        self.provision_for(&identity, device_name, location)
    }

    /// Provision a device for an already authorized identity
    pub fn provision_for(
        &self,
        identity: &Identity,
        device_name: &str,
        location: &str,
    ) -> Result<DeviceProfile> {
        require_field("device_name", device_name)?;
        require_location(location)?;

        let _guard = self.snapshot_gate.read();
        let profile = self
            .provisioner
            .provision(&identity.email, device_name, location);
        info!(
            email = %identity.email,
            device = %device_name,
            location = %location,
            "Device profile issued"
        );
        Ok(profile)
    }

    /// Caller's devices, oldest first
    pub fn list_devices(&self, auth_header: Option<&str>) -> Result<Vec<DeviceRecord>> {
        let identity = self.authorize(auth_header)?;
        Ok(self.provisioner.list_for(&identity.email))
    }

    /// Admin policy + aggregate counts
    pub fn admin_snapshot(&self, admin_key: Option<&str>) -> Result<AdminSnapshot> {
        self.admin.authorize(admin_key).map_err(|e| {
            warn!("Admin metrics request denied");
            e
        })?;
        Ok(self.snapshot())
    }

    /// Consistent counts across all stores
    pub fn snapshot(&self) -> AdminSnapshot {
        let _guard = self.snapshot_gate.write();
        aggregate::collect(&self.accounts, &self.sessions, &self.provisioner)
    }
}

impl Default for VpnService {
    fn default() -> Self {
        Self::new(ProfileTemplate::default(), None)
    }
}

fn require_field(name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(VpnError::BadRequest(format!("Missing required field: {}", name)));
    }
    Ok(())
}

/// The location is written into the profile's Endpoint line
fn require_location(location: &str) -> Result<()> {
    require_field("location", location)?;
    if location.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(VpnError::BadRequest(
            "location must not contain whitespace or control characters".into(),
        ));
    }
    Ok(())
}
