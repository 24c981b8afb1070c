mod context;
pub mod ledger;
pub mod msp;
mod operation;
mod service;
pub mod state;

pub(crate) use context::Context;
pub(crate) use operation::Operation;
pub use service::{serve, start_ledger_peer};

use booking_ledger::rpc::{
    ledger_gateway_server::LedgerGateway, CommitStatusResponse, EndorseResponse, EvaluateResponse,
    HealthCheck, SignedCommitStatusRequest, SignedEnvelope, SignedProposal, SubmitResponse,
};
use std::{collections::HashMap, sync::Arc};
use tonic::{Request, Response, Status};
use tracing::info;

use crate::{
    chaincode::chaincode_for,
    config::Config,
    operations,
    server::{context::Channel, ledger::Ledger, msp::Msp, state::StateStore},
};

pub struct LedgerPeer<S: StateStore> {
    config: Arc<Config>,
    state: Arc<S>,
    msp: Arc<Msp>,
    channels: Arc<HashMap<String, Channel<S>>>,
}

impl<S: StateStore> Clone for LedgerPeer<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            state: self.state.clone(),
            msp: self.msp.clone(),
            channels: self.channels.clone(),
        }
    }
}

impl<S: StateStore> LedgerPeer<S> {
    pub fn new(config: Config, state: Arc<S>) -> Self {
        let msp = Msp::new(&config.organizations);

        let channels = config
            .channels
            .iter()
            .map(|channel| {
                let chaincodes = channel
                    .chaincodes
                    .iter()
                    .map(|chaincode| (chaincode.name.clone(), chaincode_for(chaincode.contract)))
                    .collect();
                info!(
                    "Serving channel {} with {} chaincode(s)",
                    channel.name,
                    channel.chaincodes.len()
                );

                let ledger = Arc::new(Ledger::new(&channel.name, state.clone()));
                (channel.name.clone(), Channel { ledger, chaincodes })
            })
            .collect();

        Self {
            config: Arc::new(config),
            state,
            msp: Arc::new(msp),
            channels: Arc::new(channels),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The block log of the given channel, if this peer serves it.
    pub fn ledger(&self, channel: &str) -> Option<Arc<Ledger<S>>> {
        self.channels
            .get(channel)
            .map(|channel| channel.ledger.clone())
    }

    pub(crate) fn context(&self) -> Context<S> {
        Context {
            config: self.config.clone(),
            state: self.state.clone(),
            msp: self.msp.clone(),
            channels: self.channels.clone(),
        }
    }
}

#[tonic::async_trait]
impl<S: StateStore> LedgerGateway for LedgerPeer<S> {
    async fn health(&self, _: Request<HealthCheck>) -> Result<Response<HealthCheck>, Status> {
        Ok(Response::new(HealthCheck { check: true }))
    }

    async fn evaluate(
        &self,
        request: Request<SignedProposal>,
    ) -> Result<Response<EvaluateResponse>, Status> {
        operations::Evaluate
            .handle_request(self.context(), request)
            .await
    }

    async fn endorse(
        &self,
        request: Request<SignedProposal>,
    ) -> Result<Response<EndorseResponse>, Status> {
        operations::Endorse
            .handle_request(self.context(), request)
            .await
    }

    async fn submit(
        &self,
        request: Request<SignedEnvelope>,
    ) -> Result<Response<SubmitResponse>, Status> {
        operations::Submit
            .handle_request(self.context(), request)
            .await
    }

    async fn commit_status(
        &self,
        request: Request<SignedCommitStatusRequest>,
    ) -> Result<Response<CommitStatusResponse>, Status> {
        operations::CommitStatus
            .handle_request(self.context(), request)
            .await
    }
}
