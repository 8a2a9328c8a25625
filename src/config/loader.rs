use crate::cli::WProxyArguments;
use crate::config::types::{Config, normalize_auth};
use crate::utils::validation::is_empty_or_whitespace;
use anyhow::{Context, Result};
use log::{debug, trace};
use std::path::Path;

impl Config {
    /// Load configuration from a JSON file, every missing key falls back to its default
    pub async fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());
        let content = tokio::fs::read_to_string(path).await.with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config =
            serde_json::from_str::<Config>(&content).with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.auth = normalize_auth(config.auth.take());
        trace!("Loaded config: {:#?}", config);
        Ok(config)
    }

    /// Build the effective configuration: the optional file first, then every flag actually passed on the command line
    pub async fn from_arguments(args: &WProxyArguments) -> Result<Self> {
        let mut config = match args.config_path.as_deref() {
            Some(path) if !is_empty_or_whitespace(path) => Self::try_load(path).await?,
            _ => Self::default(),
        };
        config.apply_arguments(args);
        Ok(config)
    }

    fn apply_arguments(&mut self, args: &WProxyArguments) {
        if let Some(addr) = &args.addr {
            self.address = addr.clone();
        }
        if let Some(port) = &args.port {
            self.port = port.clone();
        }
        if args.auth.is_some() {
            self.auth = normalize_auth(args.auth.clone());
        }
        self.transparent_proxy |= args.tproxy;
        self.debug |= args.debug;
    }
}
