//! Shared response and request helpers for the JSON routes

use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full, Limited};
use hyper::body::Body;
use hyper::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, AUTHORIZATION, CONTENT_TYPE,
};
use hyper::{Request, Response, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::types::{Result, VpnError};

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 10 * 1024;

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization, X-Admin-Key";

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into())
        .map_err(|never| match never {})
        .boxed()
}

pub fn empty_body() -> BoxBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

fn with_cors(response: &mut Response<BoxBody>) {
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    let mut response = Response::new(full_body(json));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    with_cors(&mut response);
    response
}

/// Map an error onto its status and `{error, code}` body
pub fn error_response(err: VpnError) -> Response<BoxBody> {
    let status = err.status_code();
    let code = err.code();
    if status.is_server_error() {
        error!(code = code, error = %err, "Request failed");
    } else {
        warn!(code = code, status = status.as_u16(), "Request rejected");
    }

    json_response(
        status,
        &ErrorResponse {
            error: err.to_string(),
            code: code.to_string(),
        },
    )
}

/// 200 with the serialized value, or the mapped error
pub fn respond<T: Serialize>(result: Result<T>) -> Response<BoxBody> {
    match result {
        Ok(body) => json_response(StatusCode::OK, &body),
        Err(e) => error_response(e),
    }
}

pub fn cors_preflight() -> Response<BoxBody> {
    let mut response = Response::new(empty_body());
    *response.status_mut() = StatusCode::NO_CONTENT;
    with_cors(&mut response);
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    response
}

pub fn not_found(path: &str) -> Response<BoxBody> {
    error_response(VpnError::NotFound(path.to_string()))
}

/// Collect and decode a JSON body, rejecting anything over `MAX_BODY_BYTES`
pub async fn parse_json_body<T, B>(req: Request<B>) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let body = Limited::new(req.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| VpnError::BadRequest(format!("Failed to read body: {}", e)))?;

    Ok(serde_json::from_slice(&body.to_bytes())?)
}

/// Header value as a string, if present and valid
pub fn get_header<'a, B>(req: &'a Request<B>, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|v| v.to_str().ok())
}

pub fn get_auth_header<B>(req: &Request<B>) -> Option<String> {
    get_header(req, AUTHORIZATION.as_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        name: String,
    }

    fn request(body: impl Into<Bytes>) -> Request<Full<Bytes>> {
        Request::new(Full::new(body.into()))
    }

    #[tokio::test]
    async fn test_parse_json_body() {
        let probe: Probe = parse_json_body(request(r#"{"name":"x"}"#)).await.unwrap();
        assert_eq!(probe.name, "x");
    }

    #[tokio::test]
    async fn test_invalid_json_is_bad_request() {
        let result: Result<Probe> = parse_json_body(request("{not json")).await;
        assert!(matches!(result, Err(VpnError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let big = format!(r#"{{"name":"{}"}}"#, "a".repeat(MAX_BODY_BYTES));
        let result: Result<Probe> = parse_json_body(request(big)).await;
        assert!(matches!(result, Err(VpnError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = error_response(VpnError::Conflict);
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            response.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, "email_exists");
    }

    #[test]
    fn test_preflight() {
        let response = cors_preflight();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().contains_key(ACCESS_CONTROL_MAX_AGE));
    }
}
