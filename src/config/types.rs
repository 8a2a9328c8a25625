use crate::utils::validation::join_host_port;
use serde::Deserialize;
use std::fmt::Display;

/// Process-wide proxy settings.
///
/// Built once before the listener starts and shared read-only afterwards, so it carries no
/// interior mutability and is never locked.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    // Address to listen on
    #[serde(rename = "addr", default = "default_address")]
    pub(crate) address: String,
    // Port to listen on, kept as text the way it was supplied
    #[serde(default = "default_port")]
    pub(crate) port: String,
    // "user:password"; absent disables authentication
    #[serde(default)]
    pub(crate) auth: Option<String>,
    // Append the client IP to X-Forwarded-For on forwarded requests
    #[serde(rename = "tproxy", default)]
    pub(crate) transparent_proxy: bool,
    #[serde(default)]
    pub(crate) debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { address: default_address(), port: default_port(), auth: None, transparent_proxy: false, debug: false }
    }
}

impl Config {
    pub fn new(address: impl Into<String>, port: impl Into<String>, auth: Option<String>, transparent_proxy: bool, debug: bool) -> Self {
        Self { address: address.into(), port: port.into(), auth: normalize_auth(auth), transparent_proxy, debug }
    }

    pub fn get_address(&self) -> &str {
        &self.address
    }

    pub fn get_port(&self) -> &str {
        &self.port
    }

    /// The configured `user:password` credential, if authentication is enabled
    pub fn auth(&self) -> Option<&str> {
        self.auth.as_deref()
    }

    pub fn is_auth_enabled(&self) -> bool {
        self.auth.is_some()
    }

    pub fn is_transparent_proxy(&self) -> bool {
        self.transparent_proxy
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// The `address:port` string the listener binds to
    pub fn listen_address(&self) -> String {
        join_host_port(&self.address, &self.port)
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (auth: {}, tproxy: {}, debug: {})",
            self.listen_address(),
            if self.is_auth_enabled() { "on" } else { "off" },
            self.transparent_proxy,
            self.debug
        )
    }
}

/// An empty credential means authentication is off. Anything else, even blanks, is a credential.
pub(crate) fn normalize_auth(auth: Option<String>) -> Option<String> {
    auth.filter(|a| !a.is_empty())
}

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> String {
    "8888".to_string()
}
