//! Key material and virtual address allocation
//!
//! Keys are placeholders: two independent random values, hex encoded. The
//! public key is NOT derived from the private key.

use rand::Rng;
use std::fmt;
use std::net::Ipv4Addr;

/// Random bytes per key (128 bits)
pub const KEY_BYTES: usize = 16;

/// Octets are drawn from `[0, ADDRESS_OCTET_RANGE)`
pub const ADDRESS_OCTET_RANGE: u8 = 200;

/// Private/public key pair for one device
#[derive(Clone)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
}

impl KeyPair {
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let private: [u8; KEY_BYTES] = rng.gen();
        let public: [u8; KEY_BYTES] = rng.gen();
        Self {
            private_key: hex::encode(private),
            public_key: hex::encode(public),
        }
    }
}

// Keep the private key out of logs
impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// A host address inside 10.8.0.0/16, rendered with a /32 mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualAddress(Ipv4Addr);

impl VirtualAddress {
    /// Draw a random address.
    ///
    /// No check against previously issued addresses: two devices can end up
    /// with the same address.
    pub fn allocate() -> Self {
        let mut rng = rand::thread_rng();
        let o1 = rng.gen_range(0..ADDRESS_OCTET_RANGE);
        let o2 = rng.gen_range(0..ADDRESS_OCTET_RANGE);
        Self(Ipv4Addr::new(10, 8, o1, o2))
    }

    pub fn ip(&self) -> Ipv4Addr {
        self.0
    }
}

impl fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/32", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypair_shape() {
        let keys = KeyPair::generate();
        assert_eq!(keys.private_key.len(), KEY_BYTES * 2);
        assert_eq!(keys.public_key.len(), KEY_BYTES * 2);
        assert!(keys.private_key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(keys.private_key, keys.public_key);
    }

    #[test]
    fn test_private_keys_unique() {
        let keys: std::collections::HashSet<String> =
            (0..500).map(|_| KeyPair::generate().private_key).collect();
        assert_eq!(keys.len(), 500);
    }

    #[test]
    fn test_debug_redacts_private_key() {
        let keys = KeyPair::generate();
        let printed = format!("{:?}", keys);
        assert!(!printed.contains(&keys.private_key));
        assert!(printed.contains(&keys.public_key));
    }

    #[test]
    fn test_address_range() {
        for _ in 0..2000 {
            let addr = VirtualAddress::allocate();
            let [a, b, c, d] = addr.ip().octets();
            assert_eq!((a, b), (10, 8));
            assert!(c < ADDRESS_OCTET_RANGE);
            assert!(d < ADDRESS_OCTET_RANGE);
        }
    }

    #[test]
    fn test_address_display() {
        let addr = VirtualAddress(Ipv4Addr::new(10, 8, 3, 199));
        assert_eq!(addr.to_string(), "10.8.3.199/32");
    }
}
