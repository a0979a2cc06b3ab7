//! Service info, health and version endpoints
//!
//! - GET /                 - service banner
//! - GET /health, /healthz - liveness probe, always 200 while running
//! - GET /version          - build info for deployment verification

use hyper::{Response, StatusCode};
use serde::Serialize;

use super::response::{json_response, BoxBody};
use crate::server::AppState;

pub const SERVICE_NAME: &str = "imuVPN API";

#[derive(Serialize)]
pub struct ServiceInfo {
    pub ok: bool,
    pub service: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    /// 'online' when every collaborator is configured, otherwise 'degraded'
    pub status: &'static str,
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    pub timestamp: String,
    pub node_id: String,
    #[serde(rename = "adminConfigured")]
    pub admin_configured: bool,
    #[serde(rename = "checkoutConfigured")]
    pub checkout_configured: bool,
}

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub commit_full: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

pub fn service_info() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &ServiceInfo {
            ok: true,
            service: SERVICE_NAME,
        },
    )
}

fn build_health_response(state: &AppState) -> HealthResponse {
    let admin_configured = state.vpn.admin_configured();
    let checkout_configured = state.checkout_configured;

    HealthResponse {
        healthy: true,
        status: if admin_configured && checkout_configured {
            "online"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        node_id: state.args.node_id.to_string(),
        admin_configured,
        checkout_configured,
    }
}

/// Liveness probe
pub fn health_check(state: &AppState) -> Response<BoxBody> {
    json_response(StatusCode::OK, &build_health_response(state))
}

pub fn version_info() -> Response<BoxBody> {
    json_response(
        StatusCode::OK,
        &VersionResponse {
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
            commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
            build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
            service: "imuvpn",
        },
    )
}
