//! Admin metrics route
//!
//! GET /admin/metrics, authorized by the X-Admin-Key header only.
//! A user bearer token is never consulted here.

use hyper::{Request, Response};

use super::response::{get_header, respond, BoxBody};
use crate::auth::ADMIN_KEY_HEADER;
use crate::server::AppState;

pub fn handle_metrics<B>(req: &Request<B>, state: &AppState) -> Response<BoxBody> {
    let key = get_header(req, ADMIN_KEY_HEADER);
    respond(state.vpn.admin_snapshot(key))
}
