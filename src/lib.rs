//! A forward HTTP/HTTPS proxy.
//!
//! CONNECT requests become raw TCP tunnels, every other request is replayed to its origin and the
//! response streamed back. Basic proxy authentication and X-Forwarded-For tagging are optional.

pub mod cli;
pub mod config;
pub mod proxy;
pub mod utils;
