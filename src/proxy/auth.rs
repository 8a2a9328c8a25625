//! Proxy authentication gate.
//!
//! Only the `Basic` scheme is understood. Anything that does not decode to exactly the configured
//! `user:password` credential fails the check; nothing here ever returns an error.

use crate::config::Config;
use crate::proxy::response::error_response;
use base64::Engine;
use base64::engine::general_purpose;
use hyper::header::{HeaderValue, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION};
use hyper::{Body, Request, Response, StatusCode};

/// Challenge sent back with every 407
pub const PROXY_AUTH_CHALLENGE: &str = r#"Basic realm="WProxy Basic Authentication""#;

/// Check a raw `Proxy-Authorization` value against the configured credential
pub fn check_auth(header: &[u8], credential: &str) -> bool {
    let Some(split) = header.iter().position(|b| *b == b' ') else {
        return false;
    };
    let (scheme, payload) = (&header[..split], &header[split + 1..]);
    if scheme != b"Basic" {
        return false;
    }
    match general_purpose::STANDARD.decode(payload) {
        Ok(decoded) => decoded == credential.as_bytes(),
        Err(_) => false,
    }
}

/// Run the gate for one request. Always passes when no credential is configured.
pub fn authorize(req: &Request<Body>, config: &Config) -> bool {
    let Some(credential) = config.auth() else {
        return true;
    };
    match req.headers().get(PROXY_AUTHORIZATION) {
        Some(value) if !value.is_empty() => check_auth(value.as_bytes(), credential),
        _ => false,
    }
}

/// The 407 response carrying the Basic challenge
pub fn proxy_auth_required() -> Response<Body> {
    let mut response = error_response(StatusCode::PROXY_AUTHENTICATION_REQUIRED, "Authorization required");
    response.headers_mut().insert(PROXY_AUTHENTICATE, HeaderValue::from_static(PROXY_AUTH_CHALLENGE));
    response
}
