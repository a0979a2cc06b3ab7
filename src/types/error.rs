//! Error types for imuvpn
//!
//! Every variant maps to an HTTP status and a stable machine-readable code
//! that clients can match on.

use hyper::StatusCode;

/// Main error type for imuvpn operations
#[derive(Debug, thiserror::Error)]
pub enum VpnError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Email already registered")]
    Conflict,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Admin authorization required")]
    AdminUnauthorized,

    #[error("Unknown plan: {0}")]
    UnknownPlan(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Checkout provider error: {0}")]
    Upstream(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VpnError {
    /// Convert error to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AdminUnauthorized => StatusCode::UNAUTHORIZED,
            Self::UnknownPlan(_) => StatusCode::NOT_FOUND,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable error code returned in response bodies
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "invalid_request",
            Self::Conflict => "email_exists",
            Self::InvalidCredentials => "bad_credentials",
            Self::Unauthorized => "unauthorized",
            Self::AdminUnauthorized => "admin_unauthorized",
            Self::UnknownPlan(_) => "unknown_plan",
            Self::NotFound(_) => "not_found",
            Self::Upstream(_) => "upstream_failure",
            Self::Config(_) => "config_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Convert to status code and body tuple for HTTP response
    pub fn into_status_code_and_body(self) -> (StatusCode, String) {
        let status = self.status_code();
        let body = self.to_string();
        (status, body)
    }
}

impl From<std::io::Error> for VpnError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for VpnError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("Invalid JSON: {}", err))
    }
}

impl From<hyper::Error> for VpnError {
    fn from(err: hyper::Error) -> Self {
        Self::BadRequest(format!("Failed to read body: {}", err))
    }
}

/// Result type alias for imuvpn operations
pub type Result<T> = std::result::Result<T, VpnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_are_401() {
        assert_eq!(VpnError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(VpnError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(VpnError::AdminUnauthorized.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_codes_are_distinct_per_failure_class() {
        assert_eq!(VpnError::Conflict.code(), "email_exists");
        assert_eq!(VpnError::UnknownPlan("x".into()).code(), "unknown_plan");
        assert_eq!(VpnError::Upstream("boom".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_ne!(VpnError::Unauthorized.code(), VpnError::AdminUnauthorized.code());
    }

    #[test]
    fn test_json_error_is_bad_request() {
        let err: VpnError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        let (status, body) = err.into_status_code_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.starts_with("Bad request: Invalid JSON"));
    }
}
