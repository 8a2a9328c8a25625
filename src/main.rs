use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info, trace};
use std::sync::Arc;
use wproxy::cli::WProxyArguments;
use wproxy::config::Config;
use wproxy::proxy;

#[tokio::main]
async fn main() -> Result<()> {
    let args = WProxyArguments::parse();
    let config = Config::from_arguments(&args).await?;
    pretty_env_logger::env_logger::builder().format_timestamp(None).filter_level(log_level(&args, &config)).init();

    info!("Starting wproxy");
    trace!("Effective config: {}", config);

    proxy::start_proxy_server(Arc::new(config)).await
}

fn log_level(args: &WProxyArguments, config: &Config) -> LevelFilter {
    if args.verbose {
        LevelFilter::Trace
    } else if config.is_debug() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}
