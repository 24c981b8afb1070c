//! Client object to interact with a ledger peer.

use crate::{api::Network, config::Config, LedgerClientError, Result};
use booking_ledger::{
    crypto::{Signer, X509Identity},
    rpc::{ledger_gateway_client::LedgerGatewayClient, HealthCheck},
};
use http_body::combinators::UnsyncBoxBody;
use hyper::client::HttpConnector;
use hyper_rustls::HttpsConnector;
use rand::{rngs::StdRng, SeedableRng};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// A `Gateway` wraps the state and infrastructure necessary to make requests
/// to a ledger peer: the TLS channel, and the identity and signer used for
/// every proposal. Cloning a `Gateway` shares the underlying connection pool.
#[derive(Clone)]
pub struct Gateway {
    config: Arc<Config>,
    tonic_client: LedgerGatewayClient<LedgerGatewayClientInner>,
    pub(crate) rng: Arc<Mutex<StdRng>>,
}

/// Connection type used by `LedgerGatewayClient`.
/// This would normally be `tonic::transport:Channel` but TLS makes it more
/// complicated.
pub(crate) type LedgerGatewayClientInner = hyper::Client<
    HttpsConnector<HttpConnector>,
    UnsyncBoxBody<tonic::codegen::Bytes, tonic::Status>,
>;

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// Build the HTTP/2 TLS channel to the configured peer.
    ///
    /// Connections are established lazily, so an unreachable peer surfaces
    /// on the first request rather than here.
    pub fn connect(config: Config) -> Result<Self> {
        debug!("Creating channel to {}", config.peer_uri);
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(config.tls_config.clone())
            .https_or_http()
            .enable_http2()
            .build();

        let client = hyper::Client::builder().http2_only(true).build(connector);
        let tonic_client = LedgerGatewayClient::with_origin(client, config.peer_uri.clone());

        Ok(Self {
            config: Arc::new(config),
            tonic_client,
            rng: Arc::new(Mutex::new(StdRng::from_entropy())),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn identity(&self) -> &X509Identity {
        &self.config.identity
    }

    pub(crate) fn signer(&self) -> &Signer {
        &self.config.signer
    }

    pub(crate) fn tonic_client(&self) -> LedgerGatewayClient<LedgerGatewayClientInner> {
        self.tonic_client.clone()
    }

    /// Ping the peer to make sure it is running and reachable
    pub async fn health(&self) -> Result<()> {
        let request = HealthCheck { check: true };
        let response = tokio::time::timeout(
            self.config.timeouts.evaluate,
            self.tonic_client().health(request),
        )
        .await
        .map_err(|_| LedgerClientError::Timeout("health"))??;

        if response.into_inner() == (HealthCheck { check: true }) {
            Ok(())
        } else {
            Err(LedgerClientError::HealthCheckFailed(
                "Invalid response from health check method.".to_string(),
            ))
        }
    }

    /// A handle to a channel served by the peer.
    pub fn network(&self, channel: impl Into<String>) -> Network {
        Network::new(self.clone(), channel.into())
    }
}
