//! Config files pointing at the PEM fixtures under `dev/test-certs`.

use booking_ledger::{
    constants::{DEFAULT_CHAINCODE_NAME, DEFAULT_CHANNEL_NAME},
    crypto::{Signer, X509Identity},
};
use booking_ledger_client::config::ConfigFile as ClientConfigFile;
use booking_ledger_peer::config::ConfigFile as PeerConfigFile;
use std::{path::PathBuf, str::FromStr, time::Duration};

/// Organisations with fixtures on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Org {
    Org1,
    Org2,
}

impl Org {
    pub fn msp_id(self) -> &'static str {
        match self {
            Org::Org1 => "Org1MSP",
            Org::Org2 => "Org2MSP",
        }
    }

    fn dir(self) -> &'static str {
        match self {
            Org::Org1 => "org1",
            Org::Org2 => "org2",
        }
    }

    fn path(self, relative: &str) -> String {
        cert_path(&format!("{}/{relative}", self.dir()))
    }

    fn file(self, relative: &str) -> PathBuf {
        cert_root().join(self.dir()).join(relative)
    }

    /// Enrollment certificate and signing key of `User1`.
    pub fn user(self) -> anyhow::Result<(X509Identity, Signer)> {
        let certificate = self.file("users/User1/msp/signcerts/cert.pem");
        let identity = X509Identity::from_file(self.msp_id(), certificate)?;
        let signer = Signer::from_key_store(self.file("users/User1/msp/keystore"))?;
        Ok((identity, signer))
    }
}

fn cert_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../dev/test-certs")
}

/// Absolute path of a fixture, quoted for TOML.
fn cert_path(relative: &str) -> String {
    let path = cert_root().join(relative);
    format!("{:?}", path.display().to_string())
}

/// Knobs of a test peer.
#[derive(Debug, Clone)]
pub struct PeerOptions {
    pub client_auth: bool,
    /// Organisations whose members the peer accepts.
    pub organizations: Vec<Org>,
    pub commit_status_wait: Duration,
}

impl Default for PeerOptions {
    fn default() -> Self {
        Self {
            client_auth: true,
            organizations: vec![Org::Org1, Org::Org2],
            commit_status_wait: Duration::from_secs(5),
        }
    }
}

impl PeerOptions {
    /// A peer running as `peer0.org1` with one channel and the booking
    /// contract installed.
    pub fn config_file(&self) -> anyhow::Result<PeerConfigFile> {
        let organizations = self
            .organizations
            .iter()
            .map(|org| {
                format!(
                    "[[organizations]]\nmsp_id = \"{}\"\nca_certificate = {}\n",
                    org.msp_id(),
                    org.path("ca/ca.crt")
                )
            })
            .collect::<String>();

        let config = format!(
            r#"
            address = "127.0.0.1"
            port = 0
            commit_status_wait = "{wait}ms"

            [tls_config]
            private_key = {tls_key}
            certificate_chain = {tls_chain}
            client_auth = {client_auth}

            [identity]
            msp_id = "Org1MSP"
            certificate = {identity}
            private_key = {tls_key}

            [[channels]]
            name = "{DEFAULT_CHANNEL_NAME}"

            [[channels.chaincodes]]
            name = "{DEFAULT_CHAINCODE_NAME}"
            contract = "booking"

            {organizations}
            "#,
            wait = self.commit_status_wait.as_millis(),
            tls_key = Org::Org1.path("peers/peer0/tls/server.key"),
            tls_chain = Org::Org1.path("peers/peer0/tls/server-chain.crt"),
            client_auth = self.client_auth,
            identity = Org::Org1.path("peers/peer0/tls/server.crt"),
        );

        Ok(PeerConfigFile::from_str(&config)?)
    }
}

/// Client config for `User1` of `org`. The client presents its TLS
/// certificate only when `client_auth` is set.
pub fn client_config_file(
    org: Org,
    port: u16,
    client_auth: bool,
) -> anyhow::Result<ClientConfigFile> {
    let client_auth = if client_auth {
        format!(
            "[client_auth]\ncertificate_chain = {}\nprivate_key = {}\n",
            org.path("users/User1/tls/client.crt"),
            org.path("users/User1/tls/client.key"),
        )
    } else {
        String::new()
    };

    let config = format!(
        r#"
        peer_uri = "https://localhost:{port}"
        ca_chain = {ca_chain}
        msp_id = "{msp_id}"
        identity_certificate = {certificate}
        key_store = {key_store}

        [timeouts]
        evaluate = "5s"
        endorse = "5s"
        submit = "5s"
        commit_status = "10s"

        {client_auth}
        "#,
        ca_chain = Org::Org1.path("peers/peer0/tls/ca.crt"),
        msp_id = org.msp_id(),
        certificate = org.path("users/User1/msp/signcerts/cert.pem"),
        key_store = org.path("users/User1/msp/keystore"),
    );

    Ok(ClientConfigFile::from_str(&config)?)
}
