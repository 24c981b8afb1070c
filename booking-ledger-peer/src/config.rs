use booking_ledger::{
    config::LoggingConfig,
    crypto::{Signer, X509Identity},
    infrastructure::pem_utils,
};
use rustls::{
    server::{AllowAnyAuthenticatedClient, NoClientAuth},
    Certificate, RootCertStore, ServerConfig,
};
use serde::{Deserialize, Serialize};
use std::{
    net::IpAddr,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use crate::LedgerPeerError;

/// Peer configuration with all fields ready to use
#[derive(Clone)]
pub struct Config {
    pub address: IpAddr,
    pub port: u16,
    pub tls_config: ServerConfig,
    pub organizations: Vec<Organization>,
    pub channels: Vec<ChannelConfig>,
    /// Identity the peer signs endorsements with.
    pub identity: X509Identity,
    pub signer: Signer,
    /// Longest time a commit status request waits for its transaction.
    pub commit_status_wait: Duration,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file(
        config_path: impl AsRef<Path>,
        private_key_bytes: Option<Vec<u8>>,
    ) -> Result<Self, LedgerPeerError> {
        let config_string = std::fs::read_to_string(&config_path)
            .map_err(|e| LedgerPeerError::FileIo(e, config_path.as_ref().to_path_buf()))?;
        let config_file = ConfigFile::from_str(&config_string)?;
        Self::from_config_file(config_file, private_key_bytes)
    }

    pub fn from_config_file(
        config: ConfigFile,
        private_key_bytes: Option<Vec<u8>>,
    ) -> Result<Self, LedgerPeerError> {
        let organizations = config
            .organizations
            .iter()
            .map(OrganizationConfig::load)
            .collect::<Result<Vec<_>, _>>()?;

        let client_roots = organizations
            .iter()
            .map(|org| Certificate(org.ca_certificate.clone()))
            .collect::<Vec<_>>();
        let tls_config = config
            .tls_config
            .into_rustls_config(private_key_bytes, &client_roots)?;

        let identity =
            X509Identity::from_file(&config.identity.msp_id, &config.identity.certificate)?;
        let signer = Signer::from_file(&config.identity.private_key)?;

        Ok(Self {
            address: config.address,
            port: config.port,
            tls_config,
            organizations,
            channels: config.channels,
            identity,
            signer,
            commit_status_wait: config.commit_status_wait,
            logging: config.logging,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("tls_config", &"[Does not implement Debug]")
            .field("organizations", &self.organizations)
            .field("channels", &self.channels)
            .field("identity", &self.identity.msp_id())
            .field("commit_status_wait", &self.commit_status_wait)
            .finish()
    }
}

/// Peer configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
#[non_exhaustive]
pub struct ConfigFile {
    pub address: IpAddr,
    pub port: u16,
    pub tls_config: TlsConfig,
    pub identity: IdentityConfig,
    pub organizations: Vec<OrganizationConfig>,
    pub channels: Vec<ChannelConfig>,
    #[serde(with = "humantime_serde", default = "default_commit_status_wait")]
    pub commit_status_wait: Duration,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_commit_status_wait() -> Duration {
    Duration::from_secs(60)
}

impl FromStr for ConfigFile {
    type Err = LedgerPeerError;

    fn from_str(config_string: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(config_string)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct TlsConfig {
    /// The private key can be provided as a file or passed to the
    /// [`Config`] constructors.
    pub private_key: Option<PathBuf>,
    pub certificate_chain: PathBuf,
    /// Require clients to present a certificate issued by one of the
    /// configured organisations.
    #[serde(default)]
    pub client_auth: bool,
}

impl TlsConfig {
    pub fn into_rustls_config(
        &self,
        private_key_bytes: Option<Vec<u8>>,
        client_roots: &[Certificate],
    ) -> Result<ServerConfig, LedgerPeerError> {
        let chain = pem_utils::read_certificates(&self.certificate_chain)?;

        let key = if let Some(bytes) = private_key_bytes {
            pem_utils::read_private_key_from_bytes(&bytes)?
        } else if let Some(key_path) = &self.private_key {
            pem_utils::read_private_key_from_file(key_path)?
        } else {
            return Err(LedgerPeerError::PrivateKeyMissing);
        };

        let client_auth = if self.client_auth {
            let mut client_auth_roots = RootCertStore::empty();
            for root in client_roots {
                client_auth_roots.add(root)?;
            }

            AllowAnyAuthenticatedClient::new(client_auth_roots)
        } else {
            NoClientAuth::new()
        };

        let mut tls = ServerConfig::builder()
            .with_safe_defaults()
            .with_client_cert_verifier(client_auth)
            .with_single_cert(chain, key)?;
        tls.alpn_protocols = vec![b"h2".to_vec()];

        Ok(tls)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct IdentityConfig {
    pub msp_id: String,
    pub certificate: PathBuf,
    pub private_key: PathBuf,
}

/// A member organisation as it appears in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct OrganizationConfig {
    pub msp_id: String,
    pub ca_certificate: PathBuf,
}

impl OrganizationConfig {
    fn load(&self) -> Result<Organization, LedgerPeerError> {
        let ca_certificate = pem_utils::read_certificates(&self.ca_certificate)?
            .into_iter()
            .next()
            .ok_or_else(|| LedgerPeerError::MissingCaCertificate(self.msp_id.clone()))?;

        Ok(Organization {
            msp_id: self.msp_id.clone(),
            ca_certificate: ca_certificate.0,
        })
    }
}

/// A member organisation: its MSP ID and the DER encoded certificate of the CA
/// issuing its members' certificates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub msp_id: String,
    pub ca_certificate: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct ChannelConfig {
    pub name: String,
    pub chaincodes: Vec<ChaincodeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields, rename_all = "snake_case")]
pub struct ChaincodeConfig {
    pub name: String,
    pub contract: ContractKind,
}

/// Contracts a peer knows how to run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    Booking,
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_ledger::config::LoggingFileConfig;
    use tracing::Level;

    #[test]
    fn config_from_str() {
        let config_str = r#"
            address = "127.0.0.2"
            port = 7051
            commit_status_wait = "30s"

            [tls_config]
            private_key = "server.key"
            certificate_chain = "server-chain.crt"
            client_auth = true

            [identity]
            msp_id = "Org1MSP"
            certificate = "server.crt"
            private_key = "server.key"

            [[organizations]]
            msp_id = "Org1MSP"
            ca_certificate = "org1/ca.crt"

            [[organizations]]
            msp_id = "Org2MSP"
            ca_certificate = "org2/ca.crt"

            [[channels]]
            name = "mychannel"

            [[channels.chaincodes]]
            name = "basic"
            contract = "booking"

            [logging]
            stdout_log_level = "INFO"

            [logging.log_files]
            booking_ledger_logs_file_name = "./dev/logs/peer.log"
            all_logs_file_name = "./dev/logs/all.log"
        "#;

        // Destructure so the test breaks when fields are added
        let ConfigFile {
            address,
            port,
            tls_config,
            identity,
            organizations,
            channels,
            commit_status_wait,
            logging,
        } = ConfigFile::from_str(config_str).unwrap();

        assert_eq!(address, IpAddr::from_str("127.0.0.2").unwrap());
        assert_eq!(port, 7051);
        assert_eq!(commit_status_wait, Duration::from_secs(30));
        assert_eq!(tls_config.private_key, Some(PathBuf::from("server.key")));
        assert_eq!(
            tls_config.certificate_chain,
            PathBuf::from("server-chain.crt")
        );
        assert!(tls_config.client_auth);
        assert_eq!(identity.msp_id, "Org1MSP");
        assert_eq!(identity.certificate, PathBuf::from("server.crt"));
        assert_eq!(identity.private_key, PathBuf::from("server.key"));
        assert_eq!(organizations.len(), 2);
        assert_eq!(organizations[1].msp_id, "Org2MSP");
        assert_eq!(organizations[1].ca_certificate, PathBuf::from("org2/ca.crt"));
        assert_eq!(
            channels,
            vec![ChannelConfig {
                name: "mychannel".to_string(),
                chaincodes: vec![ChaincodeConfig {
                    name: "basic".to_string(),
                    contract: ContractKind::Booking,
                }],
            }]
        );
        let expected_log = LoggingConfig {
            stdout_log_level: Level::INFO,
            log_files: Some(LoggingFileConfig {
                booking_ledger_logs_file_name: "./dev/logs/peer.log".parse().unwrap(),
                all_logs_file_name: "./dev/logs/all.log".parse().unwrap(),
            }),
        };
        assert_eq!(logging, expected_log);
    }

    #[test]
    fn defaults_apply_to_optional_fields() {
        let config_str = r#"
            address = "127.0.0.1"
            port = 7051

            [tls_config]
            certificate_chain = "server-chain.crt"

            [identity]
            msp_id = "Org1MSP"
            certificate = "server.crt"
            private_key = "server.key"

            organizations = []
            channels = []
        "#;

        // `organizations` and `channels` land inside `[identity]` above, so
        // they are rejected as unknown fields there.
        assert!(ConfigFile::from_str(config_str).is_err());

        let config_str = r#"
            address = "127.0.0.1"
            port = 7051
            organizations = []
            channels = []

            [tls_config]
            certificate_chain = "server-chain.crt"

            [identity]
            msp_id = "Org1MSP"
            certificate = "server.crt"
            private_key = "server.key"
        "#;

        let config = ConfigFile::from_str(config_str).unwrap();
        assert_eq!(config.commit_status_wait, Duration::from_secs(60));
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(!config.tls_config.client_auth);
        assert!(config.tls_config.private_key.is_none());
    }

    #[test]
    fn unknown_contract_is_rejected() {
        let config_str = r#"
            name = "basic"
            contract = "marbles"
        "#;
        assert!(toml::from_str::<ChaincodeConfig>(config_str).is_err());
    }
}
