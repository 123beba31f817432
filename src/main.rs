//! FinanceFlow main entry point

use anyhow::Context;
use clap::Parser;
use finflow_api::{start_server, AppState};
use finflow_config::Config;
use finflow_core::{MockFinanceService, PositionStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "finflow")]
#[command(version = "0.1.0")]
#[command(about = "A small-business finance tracker with natural-language expense entry", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,

    /// Override server.host
    #[arg(long, env = "FINFLOW_HOST")]
    host: Option<String>,

    /// Override server.port
    #[arg(long, env = "FINFLOW_PORT")]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let mut config = Config::load_or_default(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;
    config.apply_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate().context("Invalid configuration")?;

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if args.config.exists() {
        log::info!("Config loaded from {}", args.config.display());
    } else {
        log::warn!("Config file {} not found, using defaults", args.config.display());
    }
    log::info!(
        "Data directory: {}, simulated latency: {} ms",
        config.data.path.display(),
        config.service.latency_ms
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let layout_path = config.layout_path();
        let store = PositionStore::load(&layout_path)
            .await
            .with_context(|| format!("Failed to read layout store {}", layout_path.display()))?;

        let service = MockFinanceService::from_config(&config);
        let state = AppState::new(config, Arc::new(service), store);

        start_server(state).await.context("Server error")
    })
}
