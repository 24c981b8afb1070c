use std::{path::PathBuf, sync::Arc};

use base64::{engine::general_purpose::STANDARD, Engine};
use booking_ledger::{constants::env, infrastructure::logging::init_logging};
use booking_ledger_client::Gateway;
use booking_ledger_rest::{server::start_rest_server, Config};
use clap::Parser;
use tracing::info;

/// Crates whose events reach the workspace log outputs.
const LOG_TARGETS: &[&str] = &[
    "booking_ledger",
    "booking_ledger_client",
    "booking_ledger_rest",
    "booking_rest_cli",
];

#[derive(Parser)] //Should not derive debug, contains secrets
pub struct Cli {
    /// Path to the REST server config file
    pub config: PathBuf,
    /// Base64 encoded private key data for the client TLS certificate
    #[clap(long)]
    pub private_key: Option<String>,
    /// Channel to submit transactions on. Overrides the client config.
    #[clap(long, env = env::CHANNEL_NAME)]
    pub channel: Option<String>,
    /// Chaincode to submit transactions to. Overrides the client config.
    #[clap(long, env = env::CHAINCODE_NAME)]
    pub chaincode: Option<String>,
}

#[tokio::main]
pub async fn main() {
    if let Err(e) = run_main().await {
        eprintln!("REST server error: {e}");
    }
}

pub async fn run_main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    let private_key_bytes = cli
        .private_key
        .map(|key| STANDARD.decode(key))
        .transpose()?;

    let mut config = Config::from_file(&cli.config, private_key_bytes)?;
    if let Some(channel) = cli.channel.filter(|name| !name.is_empty()) {
        config.client.channel = channel;
    }
    if let Some(chaincode) = cli.chaincode.filter(|name| !name.is_empty()) {
        config.client.chaincode = chaincode;
    }

    // We keep `_logging` around for the lifetime of the server. On drop, this value
    // will ensure that our logs are flushed.
    let _logging = init_logging(&config.logging, LOG_TARGETS)?;
    info!("Logging config settings: {:?}", config.logging);
    info!(
        "Forwarding to chaincode {} on channel {}",
        config.client.chaincode, config.client.channel
    );

    let gateway = Gateway::connect(config.client.clone())?;
    let contract = gateway
        .network(config.client.channel.as_str())
        .contract(config.client.chaincode.as_str());

    start_rest_server(&config, Arc::new(contract)).await?;
    Ok(())
}
