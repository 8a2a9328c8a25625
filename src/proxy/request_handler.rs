use crate::config::Config;
use crate::proxy::auth::{authorize, proxy_auth_required};
use crate::proxy::forwarder::{HttpClient, build_client, handle_http};
use crate::proxy::tunnel::handle_tunneling;
use anyhow::Result;
use hyper::{Body, Method, Request, Response, header};
use log::debug;
use std::net::SocketAddr;
use std::sync::Arc;

/// Extract the request target's authority: the URI authority first, then the Host header
pub fn extract_host(req: &Request<Body>) -> Option<String> {
    if let Some(authority) = req.uri().authority() {
        return Some(authority.to_string());
    }
    req.headers().get(header::HOST).and_then(|hv| hv.to_str().ok()).map(|host| host.to_string())
}

/// Per-server request dispatcher, cloned into every connection
#[derive(Clone)]
pub struct ProxyHandler {
    config: Arc<Config>,
    client: HttpClient,
}

impl ProxyHandler {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config, client: build_client() }
    }

    /// Authenticate, then tunnel CONNECT requests and forward everything else
    pub async fn handle_request(&self, client_addr: SocketAddr, req: Request<Body>) -> Result<Response<Body>> {
        if !authorize(&req, &self.config) {
            debug!("Rejected unauthenticated {} from {}", req.method(), client_addr);
            return Ok(proxy_auth_required());
        }

        debug!("Received request {} {} {}", req.method(), extract_host(&req).unwrap_or_default(), client_addr);

        if req.method() == Method::CONNECT {
            handle_tunneling(req).await
        } else {
            handle_http(&self.client, &self.config, client_addr.ip(), req).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;
    use hyper::header::{PROXY_AUTHENTICATE, PROXY_AUTHORIZATION};
    use tokio::net::TcpListener;

    fn client_addr() -> SocketAddr {
        "127.0.0.1:50000".parse().unwrap()
    }

    fn handler(auth: Option<&str>) -> ProxyHandler {
        ProxyHandler::new(Arc::new(Config::new("127.0.0.1", "0", auth.map(str::to_string), false, false)))
    }

    #[test]
    fn test_extract_host_from_uri_authority() {
        let req = Request::builder().uri("http://example.com:8080/path").body(Body::empty()).unwrap();
        assert_eq!(extract_host(&req), Some("example.com:8080".to_string()));
    }

    #[test]
    fn test_extract_host_from_connect_target() {
        let req = Request::builder().method(Method::CONNECT).uri("example.com:443").body(Body::empty()).unwrap();
        assert_eq!(extract_host(&req), Some("example.com:443".to_string()));
    }

    #[test]
    fn test_extract_host_from_header() {
        let req = Request::builder().uri("/path").header("Host", "api.example.com:8080").body(Body::empty()).unwrap();
        assert_eq!(extract_host(&req), Some("api.example.com:8080".to_string()));
    }

    #[test]
    fn test_extract_host_priority_uri_over_header() {
        let req = Request::builder().uri("http://uri.example.com/path").header("Host", "header.example.com").body(Body::empty()).unwrap();
        assert_eq!(extract_host(&req), Some("uri.example.com".to_string()));
    }

    #[test]
    fn test_extract_host_none() {
        let req = Request::builder().uri("/path").body(Body::empty()).unwrap();
        assert_eq!(extract_host(&req), None);
    }

    #[tokio::test]
    async fn test_handle_request_requires_auth() {
        let req = Request::builder().uri("http://example.com/").body(Body::empty()).unwrap();
        let response = handler(Some("user:pass")).handle_request(client_addr(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PROXY_AUTHENTICATION_REQUIRED);
        assert!(response.headers().contains_key(PROXY_AUTHENTICATE));
    }

    #[tokio::test]
    async fn test_handle_request_connect_rejected_before_dial() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let req = Request::builder().method(Method::CONNECT).uri(addr.as_str()).header(PROXY_AUTHORIZATION, "Bearer nope").body(Body::empty()).unwrap();

        let response = handler(Some("user:pass")).handle_request(client_addr(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PROXY_AUTHENTICATION_REQUIRED);

        // Nothing was dialed
        let accepted = tokio::time::timeout(std::time::Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err());
    }

    #[tokio::test]
    async fn test_handle_request_routes_connect_to_tunnel() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let req = Request::builder().method(Method::CONNECT).uri(addr.as_str()).body(Body::empty()).unwrap();

        // Dial succeeds, but a hand-built request has no connection to hijack
        let response = handler(None).handle_request(client_addr(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_handle_request_routes_other_methods_to_forwarder() {
        let req = Request::builder().method(Method::GET).uri("/not-absolute").body(Body::empty()).unwrap();
        let response = handler(None).handle_request(client_addr(), req).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
