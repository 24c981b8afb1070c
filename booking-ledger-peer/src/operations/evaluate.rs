use async_trait::async_trait;
use booking_ledger::rpc::{EvaluateResponse, SignedProposal};
use tracing::info;

use crate::{
    server::{state::StateStore, Context, Operation},
    LedgerPeerError,
};

/// Run a proposal against the world state and return its result. Nothing is
/// recorded on the ledger.
#[derive(Debug)]
pub(crate) struct Evaluate;

#[async_trait]
impl<S: StateStore> Operation<S> for Evaluate {
    type Request = SignedProposal;
    type Response = EvaluateResponse;

    async fn operation(
        self,
        request: SignedProposal,
        context: &Context<S>,
    ) -> Result<EvaluateResponse, LedgerPeerError> {
        let verified = context.verify_proposal(&request).await?;
        info!("Evaluating {}.", verified.proposal.transaction_name);

        let simulation = context.simulate(&verified).await?;
        Ok(EvaluateResponse {
            payload: simulation.payload,
        })
    }
}
