use async_trait::async_trait;
use booking_ledger::rpc::{EndorseResponse, PreparedTransaction, SignedProposal, TransactionAction};
use prost::Message;
use tracing::info;

use crate::{
    server::{state::StateStore, Context, Operation},
    LedgerPeerError,
};

/// Simulate a proposal and sign the resulting read/write set. The client
/// submits the returned prepared transaction to have it committed.
#[derive(Debug)]
pub(crate) struct Endorse;

#[async_trait]
impl<S: StateStore> Operation<S> for Endorse {
    type Request = SignedProposal;
    type Response = EndorseResponse;

    async fn operation(
        self,
        request: SignedProposal,
        context: &Context<S>,
    ) -> Result<EndorseResponse, LedgerPeerError> {
        let verified = context.verify_proposal(&request).await?;
        info!("Endorsing {}.", verified.proposal.transaction_name);

        let simulation = context.simulate(&verified).await?;

        let proposal = verified.proposal;
        let action = TransactionAction {
            tx_id: proposal.tx_id,
            channel_id: proposal.channel_id,
            chaincode_id: proposal.chaincode_id,
            transaction_name: proposal.transaction_name,
            creator: proposal.creator,
            rw_set: Some(simulation.rw_set),
            response_payload: simulation.payload,
            nonce: proposal.nonce,
        };
        let action_bytes = action.encode_to_vec();
        let endorsement = context.endorse(&action_bytes);

        Ok(EndorseResponse {
            prepared_transaction: Some(PreparedTransaction {
                action_bytes,
                endorsement: Some(endorsement),
            }),
        })
    }
}
