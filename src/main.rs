use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use msisdnd::bootstrap::Server;
use msisdnd::config::Config;
use msisdnd::telemetry::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(name = "msisdnd")]
#[command(author, version, about = "MSISDN lookup service")]
struct Args {
    /// Path to config file (built-in defaults when omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Validate config and directory, then exit
    #[arg(long)]
    validate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (to get log settings)
    let config = match args.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };

    init_tracing(&TracingConfig::from(&config.telemetry))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = ?args.config,
        "starting msisdnd"
    );

    // Builds and validates the directory
    let server = Server::new(config, args.config)?;

    if args.validate {
        info!("configuration is valid");
        return Ok(());
    }

    server.run().await
}
