//! Checkout route
//!
//! POST /billing/checkout with `{"priceId": "..."}` and a bearer token.

use bytes::Bytes;
use hyper::body::Body;
use hyper::{Request, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::response::{get_auth_header, parse_json_body, respond, BoxBody};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutBody {
    pub price_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub url: String,
}

pub async fn handle_checkout<B>(req: Request<B>, state: Arc<AppState>) -> Response<BoxBody>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    respond(checkout(req, &state).await)
}

async fn checkout<B>(req: Request<B>, state: &AppState) -> Result<CheckoutResponse>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let auth = get_auth_header(&req);
    let identity = state.vpn.authorize(auth.as_deref())?;
    let body: CheckoutBody = parse_json_body(req).await?;
    let url = state.checkout.checkout(&identity, &body.price_id).await?;
    Ok(CheckoutResponse { url })
}
