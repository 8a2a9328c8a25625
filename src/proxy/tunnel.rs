//! CONNECT handling.
//!
//! The destination is dialed first. Only once that succeeds does the client get its `200`, after
//! which hyper hands back the raw connection and one task relays both directions until either ends.
//! The proxy never looks at the bytes, so TLS passes straight through.

use crate::proxy::request_handler::extract_host;
use crate::proxy::response::error_response;
use anyhow::{Result, anyhow};
use hyper::upgrade::OnUpgrade;
use hyper::{Body, Request, Response, StatusCode};
use log::{debug, trace, warn};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Timeout for dialing the CONNECT destination.
pub const DIAL_TIMEOUT: Duration = Duration::from_secs(10);

/// Dial `host:port` over TCP, bounded by [`DIAL_TIMEOUT`]
pub async fn dial(target: &str) -> Result<TcpStream> {
    match tokio::time::timeout(DIAL_TIMEOUT, TcpStream::connect(target)).await {
        Ok(Ok(stream)) => Ok(stream),
        Ok(Err(e)) => Err(anyhow!("dial tcp {}: {}", target, e)),
        Err(_) => Err(anyhow!("dial tcp {}: i/o timeout", target)),
    }
}

/// Handle a CONNECT request
pub async fn handle_tunneling(mut req: Request<Body>) -> Result<Response<Body>> {
    let target = extract_host(&req).unwrap_or_default();

    let destination = match dial(&target).await {
        Ok(stream) => stream,
        Err(e) => {
            debug!("CONNECT {} failed: {}", target, e);
            return Ok(error_response(StatusCode::SERVICE_UNAVAILABLE, e));
        }
    };

    // The raw connection can only be seized if hyper registered an upgrade for this request
    let Some(on_upgrade) = req.extensions_mut().remove::<OnUpgrade>() else {
        warn!("CONNECT {}: connection cannot be hijacked", target);
        return Ok(error_response(StatusCode::INTERNAL_SERVER_ERROR, "Hijacking not supported"));
    };

    // Resolves once hyper has written the 200 below
    tokio::spawn(async move {
        match on_upgrade.await {
            Ok(upgraded) => {
                trace!("CONNECT {} established", target);
                relay(upgraded, destination).await;
                debug!("CONNECT {} closed", target);
            }
            Err(e) => debug!("CONNECT {} upgrade failed: {}", target, e),
        }
    });

    Ok(Response::new(Body::empty()))
}

/// Relay bytes both ways until either direction finishes, then close both connections.
///
/// Both directions run inside this one future. The first to hit EOF or an error wins the
/// `select!`, the other copy is dropped mid-flight and every half is dropped on return.
pub(crate) async fn relay<C>(client: C, mut destination: TcpStream)
where
    C: AsyncRead + AsyncWrite,
{
    let (mut client_read, mut client_write) = tokio::io::split(client);
    let (mut destination_read, mut destination_write) = destination.split();
    tokio::select! {
        _ = transfer(&mut destination_write, &mut client_read) => trace!("Client side finished first"),
        _ = transfer(&mut client_write, &mut destination_read) => trace!("Destination side finished first"),
    }
}

/// Copy `source` into `destination` until EOF or error, then shut the destination down.
///
/// The shutdown sends FIN to the peer being written to before the connection is dropped.
pub(crate) async fn transfer<W, R>(mut destination: W, mut source: R)
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
{
    match tokio::io::copy(&mut source, &mut destination).await {
        Ok(bytes) => trace!("Relay finished after {} bytes", bytes),
        Err(e) => debug!("Relay error: {}", e),
    }
    if let Err(e) = destination.shutdown().await {
        trace!("Relay shutdown error: {}", e);
    }
}
