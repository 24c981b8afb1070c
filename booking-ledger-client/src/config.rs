use booking_ledger::{
    constants::{DEFAULT_CHAINCODE_NAME, DEFAULT_CHANNEL_NAME, LOCAL_PEER_URI},
    crypto::{Signer, X509Identity},
    infrastructure::pem_utils,
};
use rustls::{ClientConfig, RootCertStore};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};
use tonic::transport::Uri;

use crate::LedgerClientError;

/// Client configuration with all fields ready to use.
#[derive(Clone)]
pub struct Config {
    pub peer_uri: Uri,
    pub tls_config: ClientConfig,
    /// Identity the client signs proposals and transactions with.
    pub identity: X509Identity,
    pub signer: Signer,
    pub channel: String,
    pub chaincode: String,
    pub timeouts: Timeouts,
}

impl Config {
    pub fn from_file(
        config_path: impl AsRef<Path>,
        private_key_bytes: Option<Vec<u8>>,
    ) -> Result<Self, LedgerClientError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| LedgerClientError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        let config_file = ConfigFile::from_str(&config_string)?;
        Self::from_config_file(config_file, private_key_bytes)
    }

    pub fn from_config_file(
        config: ConfigFile,
        private_key_bytes: Option<Vec<u8>>,
    ) -> Result<Self, LedgerClientError> {
        let identity = X509Identity::from_file(&config.msp_id, &config.identity_certificate)?;
        let signer = Signer::from_key_store(&config.key_store)?;

        Ok(Self {
            peer_uri: Uri::from_str(&config.peer_uri)?,
            tls_config: config.tls_config(private_key_bytes)?,
            identity,
            signer,
            channel: config.channel,
            chaincode: config.chaincode,
            timeouts: config.timeouts,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("peer_uri", &self.peer_uri)
            .field("tls_config", &"[Does not implement Debug]")
            .field("identity", &self.identity.msp_id())
            .field("channel", &self.channel)
            .field("chaincode", &self.chaincode)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

/// Client configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
#[non_exhaustive]
pub struct ConfigFile {
    #[serde(default = "default_peer_uri")]
    pub peer_uri: String,
    /// CA certificate(s) used to verify the peer's TLS certificate.
    pub ca_chain: PathBuf,
    pub client_auth: Option<ClientAuth>,
    pub msp_id: String,
    pub identity_certificate: PathBuf,
    /// Directory holding the identity's private key. The first file in it is
    /// used.
    pub key_store: PathBuf,
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default = "default_chaincode")]
    pub chaincode: String,
    #[serde(default)]
    pub timeouts: Timeouts,
}

fn default_peer_uri() -> String {
    LOCAL_PEER_URI.to_string()
}

fn default_channel() -> String {
    DEFAULT_CHANNEL_NAME.to_string()
}

fn default_chaincode() -> String {
    DEFAULT_CHAINCODE_NAME.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
#[non_exhaustive]
pub struct ClientAuth {
    pub certificate_chain: PathBuf,
    /// The private key can be provided as a file or passed to the
    /// [`Config`] constructors.
    pub private_key: Option<PathBuf>,
}

/// Deadlines for each call to the peer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "snake_case", default)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub evaluate: Duration,
    #[serde(with = "humantime_serde")]
    pub endorse: Duration,
    #[serde(with = "humantime_serde")]
    pub submit: Duration,
    #[serde(with = "humantime_serde")]
    pub commit_status: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            evaluate: Duration::from_secs(5),
            endorse: Duration::from_secs(15),
            submit: Duration::from_secs(5),
            commit_status: Duration::from_secs(60),
        }
    }
}

impl ConfigFile {
    pub fn tls_config(
        &self,
        private_key_bytes: Option<Vec<u8>>,
    ) -> Result<ClientConfig, LedgerClientError> {
        let mut root_store = RootCertStore::empty();

        let root_cert = pem_utils::read_certificates(&self.ca_chain)?;
        for cert in root_cert {
            root_store.add(&cert)?;
        }

        let base_tls_config = ClientConfig::builder()
            .with_safe_defaults()
            .with_root_certificates(root_store);

        let tls_config = if let Some(auth) = &self.client_auth {
            let certs = pem_utils::read_certificates(&auth.certificate_chain)?;

            let key = if let Some(bytes) = private_key_bytes {
                pem_utils::read_private_key_from_bytes(&bytes)?
            } else if let Some(key_path) = &auth.private_key {
                pem_utils::read_private_key_from_file(key_path)?
            } else {
                return Err(LedgerClientError::PrivateKeyMissing);
            };

            base_tls_config.with_single_cert(certs, key)?
        } else {
            base_tls_config.with_no_client_auth()
        };

        Ok(tls_config)
    }
}

impl FromStr for ConfigFile {
    type Err = LedgerClientError;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config_string)?)
    }
}
