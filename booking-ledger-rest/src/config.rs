use booking_ledger::config::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::{
    net::IpAddr,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::RestApiError;

/// REST server configuration with all fields ready to use
#[derive(Debug, Clone)]
pub struct Config {
    pub address: IpAddr,
    pub port: u16,
    /// Gateway client used to reach the ledger peer.
    pub client: booking_ledger_client::Config,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(
        config_path: impl AsRef<Path>,
        private_key_bytes: Option<Vec<u8>>,
    ) -> Result<Self, RestApiError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| RestApiError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        let config_file = ConfigFile::from_str(&config_string)?;
        Self::from_config_file(config_file, private_key_bytes)
    }

    pub fn from_config_file(
        config: ConfigFile,
        private_key_bytes: Option<Vec<u8>>,
    ) -> Result<Self, RestApiError> {
        let client = booking_ledger_client::Config::from_file(&config.client, private_key_bytes)?;

        Ok(Self {
            address: config.address,
            port: config.port,
            client,
            logging: config.logging,
        })
    }
}

/// REST server configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
#[non_exhaustive]
pub struct ConfigFile {
    pub address: IpAddr,
    pub port: u16,
    /// Path to the gateway client config file.
    pub client: PathBuf,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FromStr for ConfigFile {
    type Err = RestApiError;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config_string)?)
    }
}
