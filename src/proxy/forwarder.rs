use crate::config::Config;
use crate::proxy::response::error_response;
use anyhow::Result;
use hyper::client::HttpConnector;
use hyper::header::{HeaderMap, HeaderValue};
use hyper::{Body, Client, Request, Response, StatusCode};
use hyper_tls::HttpsConnector;
use log::debug;
use std::net::IpAddr;

/// Client used to replay plain HTTP requests to their origin
pub type HttpClient = Client<HttpsConnector<HttpConnector>, Body>;

pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// HTTP/1 client with hyper's default pooling; redirects are never followed
pub fn build_client() -> HttpClient {
    let https = HttpsConnector::new();
    Client::builder().build::<_, Body>(https)
}

/// The forwarded-for chain with `client_ip` appended after any existing entries.
///
/// Existing values are kept as raw bytes, so non-ASCII entries survive.
pub fn forwarded_for_chain(headers: &HeaderMap, client_ip: IpAddr) -> Vec<u8> {
    let mut chain = Vec::new();
    for value in headers.get_all(X_FORWARDED_FOR) {
        chain.extend_from_slice(value.as_bytes());
        chain.extend_from_slice(b", ");
    }
    chain.extend_from_slice(client_ip.to_string().as_bytes());
    chain
}

/// Replace every X-Forwarded-For value with the extended chain
pub fn set_forwarded_for(headers: &mut HeaderMap, client_ip: IpAddr) {
    let chain = forwarded_for_chain(headers, client_ip);
    match HeaderValue::from_bytes(&chain) {
        Ok(value) => {
            headers.insert(X_FORWARDED_FOR, value);
        }
        Err(e) => debug!("Dropping unusable X-Forwarded-For chain {:?}: {}", String::from_utf8_lossy(&chain), e),
    }
}

/// Append every value of every header in `src` to `dst`, keeping per-name order
pub fn copy_headers(dst: &mut HeaderMap, src: &HeaderMap) {
    for (name, value) in src.iter() {
        dst.append(name.clone(), value.clone());
    }
}

/// Rebuild the origin response for the client; the body is streamed, not buffered
pub fn copy_response(upstream: Response<Body>) -> Response<Body> {
    let (parts, body) = upstream.into_parts();
    let mut response = Response::new(body);
    *response.status_mut() = parts.status;
    copy_headers(response.headers_mut(), &parts.headers);
    response
}

/// Forward a non-CONNECT request to its origin and relay the response
pub async fn handle_http(client: &HttpClient, config: &Config, client_ip: IpAddr, mut req: Request<Body>) -> Result<Response<Body>> {
    if config.is_transparent_proxy() {
        set_forwarded_for(req.headers_mut(), client_ip);
    }

    let uri = req.uri().clone();
    match client.request(req).await {
        Ok(upstream) => Ok(copy_response(upstream)),
        Err(e) => {
            debug!("Forwarding {} failed: {}", uri, e);
            Ok(error_response(StatusCode::SERVICE_UNAVAILABLE, e))
        }
    }
}
