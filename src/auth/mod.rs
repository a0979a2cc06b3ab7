//! Authentication and authorization for imuvpn
//!
//! Provides:
//! - Account store (email + credential secret)
//! - Session registry (opaque bearer tokens)
//! - Authorization gate (user session policy, static admin key policy)

pub mod accounts;
pub mod gate;
pub mod sessions;

pub use accounts::{AccountStore, Identity};
pub use gate::{authorize_user, extract_token_from_header, AdminKeyValidator, ADMIN_KEY_HEADER};
pub use sessions::{Session, SessionRegistry};
