use std::{path::PathBuf, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine};
use booking_ledger::infrastructure::logging::init_logging;
use booking_ledger_peer::{server::start_ledger_peer, Config};
use booking_ledger_state_memory::MemoryStateStore;
use clap::Parser;
use tracing::info;

/// Crates whose events reach the workspace log outputs.
const LOG_TARGETS: &[&str] = &[
    "booking_ledger",
    "booking_ledger_peer",
    "booking_ledger_state_memory",
    "ledger_peer_cli",
];

#[derive(Parser)] //Should not derive debug, contains secrets
pub struct Cli {
    /// Path to the peer config file
    pub config: PathBuf,
    /// Base64 encoded private key data for the TLS certificate
    #[clap(long)]
    pub private_key: Option<String>,
}

#[tokio::main]
pub async fn main() {
    if let Err(e) = run_main().await {
        eprintln!("Peer error: {e}");
    }
}

pub async fn run_main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let private_key_bytes = cli
        .private_key
        .map(|key| STANDARD.decode(key))
        .transpose()?;

    let config = Config::from_file(&cli.config, private_key_bytes)?;

    // We keep `_logging` around for the lifetime of the peer. On drop, this value
    // will ensure that our logs are flushed.
    let _logging = init_logging(&config.logging, LOG_TARGETS)?;
    info!("Logging config settings: {:?}", config.logging);

    let state = Arc::new(MemoryStateStore::new());
    start_ledger_peer(config, state).await?;
    Ok(())
}
