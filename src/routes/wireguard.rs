//! WireGuard device routes
//!
//! - POST /wireguard/configs - provision a device for the caller
//! - GET  /wireguard/configs - list the caller's devices

use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::response::{get_auth_header, parse_json_body, respond, BoxBody};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
pub struct ProvisionRequest {
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProvisionResponse {
    pub device: String,
    pub config: String,
}

pub async fn handle_provision<B>(req: Request<B>, state: Arc<AppState>) -> Response<BoxBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    respond(provision(req, &state).await)
}

async fn provision<B>(req: Request<B>, state: &AppState) -> Result<ProvisionResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let auth = get_auth_header(&req);
    let identity = state.vpn.authorize(auth.as_deref())?;
    let body: ProvisionRequest = parse_json_body(req).await?;
    let profile = state
        .vpn
        .provision_for(&identity, &body.device_name, &body.location)?;

    Ok(ProvisionResponse {
        device: profile.device_name,
        config: profile.config,
    })
}

pub fn handle_list<B>(req: &Request<B>, state: &AppState) -> Response<BoxBody> {
    let auth = get_auth_header(req);
    respond(state.vpn.list_devices(auth.as_deref()))
}
