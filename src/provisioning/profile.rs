//! WireGuard profile rendering
//!
//! Section order and field order are fixed; client importers parse this text.

use super::keys::{KeyPair, VirtualAddress};

pub const DEFAULT_PROFILE_DOMAIN: &str = "imuvpn.example";
pub const PROFILE_DNS: &str = "1.1.1.1";
pub const ENDPOINT_PORT: u16 = 51820;
pub const ALLOWED_IPS: &str = "0.0.0.0/0, ::/0";
pub const PERSISTENT_KEEPALIVE_SECS: u32 = 25;

/// Renders profiles for one endpoint domain
#[derive(Debug, Clone)]
pub struct ProfileTemplate {
    domain: String,
}

impl ProfileTemplate {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }

    /// Endpoint for a location tag, e.g. `wg.sgp-1.imuvpn.example:51820`
    pub fn endpoint(&self, location: &str) -> String {
        format!("wg.{}.{}:{}", location, self.domain, ENDPOINT_PORT)
    }

    pub fn render(&self, keys: &KeyPair, address: &VirtualAddress, location: &str) -> String {
        format!(
            "[Interface]\n\
             PrivateKey = {private_key}\n\
             Address = {address}\n\
             DNS = {dns}\n\
             \n\
             [Peer]\n\
             PublicKey = {public_key}\n\
             Endpoint = {endpoint}\n\
             AllowedIPs = {allowed_ips}\n\
             PersistentKeepalive = {keepalive}\n",
            private_key = keys.private_key,
            address = address,
            dns = PROFILE_DNS,
            public_key = keys.public_key,
            endpoint = self.endpoint(location),
            allowed_ips = ALLOWED_IPS,
            keepalive = PERSISTENT_KEEPALIVE_SECS,
        )
    }
}

impl Default for ProfileTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_PROFILE_DOMAIN)
    }
}
