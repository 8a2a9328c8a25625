use crate::config::Config;
use crate::proxy::request_handler::ProxyHandler;
use crate::proxy::response::error_response;
use anyhow::{Context, Result, anyhow};
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, StatusCode};
use log::{error, info};
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

/// Bind the proxy and serve until the listener fails
pub async fn start_proxy_server(config: Arc<Config>) -> Result<()> {
    let (addr, server) = bind_proxy_server(config).await?;
    info!("WProxy is running on {}", addr);
    server.await.context("Proxy server error")?;
    Ok(())
}

/// Resolve and bind the listen address, returning the bound address and the server future.
///
/// The server speaks HTTP/1 only; CONNECT and the connection hand-over depend on it.
pub async fn bind_proxy_server(config: Arc<Config>) -> Result<(SocketAddr, impl Future<Output = hyper::Result<()>> + Send)> {
    let listen_address = config.listen_address();
    let addr = tokio::net::lookup_host(&listen_address)
        .await
        .with_context(|| format!("Failed to resolve listen address {}", listen_address))?
        .next()
        .ok_or_else(|| anyhow!("No address found for {}", listen_address))?;

    let handler = ProxyHandler::new(config);
    let make_svc = make_service_fn(move |conn: &AddrStream| {
        let client_addr = conn.remote_addr();
        let handler = handler.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let handler = handler.clone();
                async move {
                    match handler.handle_request(client_addr, req).await {
                        Ok(resp) => Ok::<_, Infallible>(resp),
                        Err(e) => {
                            error!("handle_request error from {}: {}", client_addr, e);
                            Ok::<_, Infallible>(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"))
                        }
                    }
                }
            }))
        }
    });

    let server = hyper::Server::try_bind(&addr).with_context(|| format!("Failed to bind proxy on {}", addr))?.http1_only(true).serve(make_svc);
    Ok((server.local_addr(), server))
}
