//! An in-process ledger peer listening on an ephemeral port.

use booking_ledger::{
    constants::DEFAULT_CHANNEL_NAME, rpc::ledger_gateway_client::LedgerGatewayClient,
};
use booking_ledger_client::{Contract, Gateway};
use booking_ledger_peer::{
    server::{ledger::Ledger, serve, LedgerPeer},
    Config as PeerConfig,
};
use booking_ledger_state_memory::MemoryStateStore;
use http_body::combinators::UnsyncBoxBody;
use hyper::client::HttpConnector;
use hyper_rustls::HttpsConnector;
use std::sync::Arc;
use tokio::{net::TcpListener, task::JoinHandle};

use crate::fixtures::{client_config_file, Org, PeerOptions};

/// Raw gRPC client to the peer, for requests the gateway client would never
/// build.
pub type RpcClient = LedgerGatewayClient<
    hyper::Client<
        HttpsConnector<HttpConnector>,
        UnsyncBoxBody<tonic::codegen::Bytes, tonic::Status>,
    >,
>;

/// A running peer. The serving task is aborted when this is dropped.
pub struct TestPeer {
    peer: LedgerPeer<MemoryStateStore>,
    port: u16,
    task: JoinHandle<()>,
}

impl TestPeer {
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(PeerOptions::default()).await
    }

    pub async fn start_with(options: PeerOptions) -> anyhow::Result<Self> {
        let config = PeerConfig::from_config_file(options.config_file()?, None)?;
        let listener = TcpListener::bind((config.address, 0)).await?;
        let port = listener.local_addr()?.port();

        let peer = LedgerPeer::new(config, Arc::new(MemoryStateStore::new()));
        let serving = peer.clone();
        let task = tokio::spawn(async move {
            let _ = serve(listener, serving).await;
        });

        Ok(Self { peer, port, task })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Block log of the default channel.
    pub fn ledger(&self) -> anyhow::Result<Arc<Ledger<MemoryStateStore>>> {
        self.peer
            .ledger(DEFAULT_CHANNEL_NAME)
            .ok_or_else(|| anyhow::anyhow!("peer does not serve {}", DEFAULT_CHANNEL_NAME))
    }

    pub fn client_config(&self, org: Org) -> anyhow::Result<booking_ledger_client::Config> {
        self.client_config_with(org, true)
    }

    pub fn client_config_with(
        &self,
        org: Org,
        client_auth: bool,
    ) -> anyhow::Result<booking_ledger_client::Config> {
        let config_file = client_config_file(org, self.port, client_auth)?;
        Ok(booking_ledger_client::Config::from_config_file(
            config_file,
            None,
        )?)
    }

    pub fn gateway(&self, org: Org) -> anyhow::Result<Gateway> {
        Ok(Gateway::connect(self.client_config(org)?)?)
    }

    /// The contract named in the client config, on the configured channel.
    pub fn contract(&self, org: Org) -> anyhow::Result<Contract> {
        let gateway = self.gateway(org)?;
        let config = gateway.config();
        let contract = gateway
            .network(config.channel.clone())
            .contract(config.chaincode.clone());
        Ok(contract)
    }

    /// A gRPC client sharing the TLS setup of `org`'s gateway client.
    pub fn rpc_client(&self, org: Org) -> anyhow::Result<RpcClient> {
        let config = self.client_config(org)?;
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(config.tls_config)
            .https_or_http()
            .enable_http2()
            .build();

        let client = hyper::Client::builder().http2_only(true).build(connector);
        Ok(LedgerGatewayClient::with_origin(client, config.peer_uri))
    }
}

impl Drop for TestPeer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
