// Proxy module
//
// This module contains the forward proxy split into focused submodules:
// - http_server: Listener setup and the per-connection service
// - request_handler: Authentication and dispatch by method
// - auth: Proxy-Authorization checking and the 407 challenge
// - tunnel: CONNECT handling and the raw byte relay
// - forwarder: Plain HTTP forwarding and X-Forwarded-For handling
// - response: Plain-text error responses

pub mod auth;
pub mod forwarder;
pub mod http_server;
pub mod request_handler;
pub mod response;
pub mod tunnel;

pub use http_server::{bind_proxy_server, start_proxy_server};
