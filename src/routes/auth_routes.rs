//! Account routes
//!
//! - POST /auth/signup - create an account
//! - POST /auth/login  - exchange credentials for a session token
//! - GET  /auth/me     - identity behind the bearer token

use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::response::{get_auth_header, parse_json_body, respond, BoxBody};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

pub async fn handle_signup<B>(req: Request<B>, state: Arc<AppState>) -> Response<BoxBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    respond(signup(req, &state).await)
}

async fn signup<B>(req: Request<B>, state: &AppState) -> Result<OkResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body: CredentialsRequest = parse_json_body(req).await?;
    state.vpn.signup(&body.email, &body.password)?;
    Ok(OkResponse { ok: true })
}

pub async fn handle_login<B>(req: Request<B>, state: Arc<AppState>) -> Response<BoxBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    respond(login(req, &state).await)
}

async fn login<B>(req: Request<B>, state: &AppState) -> Result<TokenResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body: CredentialsRequest = parse_json_body(req).await?;
    let token = state.vpn.login(&body.email, &body.password)?;
    Ok(TokenResponse { token })
}

pub fn handle_me<B>(req: &Request<B>, state: &AppState) -> Response<BoxBody> {
    let auth = get_auth_header(req);
    respond(state.vpn.whoami(auth.as_deref()))
}
