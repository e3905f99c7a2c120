//! Send-transaction gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!   POST /send-tx
//!        │
//!        ▼
//!   ┌──────────┐   ┌─────────────┐   ┌──────────────────┐   ┌───────────────┐
//!   │   http   │──▶│  validator  │──▶│ idempotency store│──▶│ ChainSubmitter│
//!   │  server  │   │ (pure, 422) │   │ claim / wait /   │   │    (stub)     │
//!   └──────────┘   └─────────────┘   │ replay           │   └───────────────┘
//!        ▲                           └──────────────────┘           │
//!        └──────────── 201 fresh / 200 replayed ◀───────────────────┘
//! ```
//!
//! Cross-cutting: config (TOML), observability (tracing + Prometheus),
//! lifecycle (startup, graceful shutdown).

use clap::Parser;
use std::path::PathBuf;

use send_tx_gateway::lifecycle::{startup, Shutdown};
use send_tx_gateway::observability::logging;

#[derive(Parser)]
#[command(name = "send-tx-gateway")]
#[command(about = "Idempotent transaction submission gateway", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = startup::resolve_config(cli.config.as_deref(), cli.bind.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "send-tx-gateway starting");

    let shutdown = Shutdown::new();
    startup::run(config, &shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
