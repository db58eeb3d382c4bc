//! `stratad`: the Strata broker daemon.
//!
//! Opens (or creates) the data directory, recovers durable state, creates
//! the demo topics if this is a fresh directory, and serves the HTTP API
//! until stopped.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use strata_server::http;
use strata_server::Broker;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Demo topics created on first boot; reopened untouched on restart.
const BOOTSTRAP_TOPICS: &[(&str, u32)] = &[("orders", 3), ("payments", 2), ("shipments", 1)];

#[derive(Parser)]
#[command(name = "stratad")]
#[command(about = "Strata event broker", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Directory to store broker data
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let data_dir = std::path::absolute(&args.data_dir)
        .with_context(|| format!("failed to resolve data directory {}", args.data_dir.display()))?;

    info!(port = args.port, data_dir = %data_dir.display(), "starting broker");

    let broker = Broker::open(&data_dir)
        .await
        .context("failed to open broker")?;

    for &(name, partitions) in BOOTSTRAP_TOPICS {
        broker
            .ensure_topic(name, partitions)
            .await
            .with_context(|| format!("failed to create topic {name:?}"))?;
    }

    let router = http::create_router(Arc::new(broker));
    http::serve(router, args.port)
        .await
        .context("broker server failed")?;

    Ok(())
}
