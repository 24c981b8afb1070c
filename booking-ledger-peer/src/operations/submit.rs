use async_trait::async_trait;
use booking_ledger::{
    crypto::{compute_transaction_id, CryptoError},
    infrastructure::logging,
    rpc::{SignedEnvelope, SubmitResponse, TxValidationCode},
};
use prost::Message;
use tracing::{info, warn};

use crate::{
    server::{ledger::PendingTransaction, state::StateStore, Context, Operation},
    LedgerPeerError,
};

/// Order an endorsed transaction into the channel's block log.
///
/// A submission whose envelope is not signed by the transaction creator, or
/// whose transaction ID is not derived from its nonce and creator, is refused
/// outright. A properly signed transaction that fails a later check
/// is still recorded, with the failure as its validation code.
#[derive(Debug)]
pub(crate) struct Submit;

#[async_trait]
impl<S: StateStore> Operation<S> for Submit {
    type Request = SignedEnvelope;
    type Response = SubmitResponse;

    async fn operation(
        self,
        request: SignedEnvelope,
        context: &Context<S>,
    ) -> Result<SubmitResponse, LedgerPeerError> {
        let prepared = request.prepared_transaction()?;
        let action = prepared.action()?;
        logging::record_field("tx_id", &action.tx_id);

        let channel = context.channel(&action.channel_id)?;
        let creator = action.creator()?;
        let _ = context
            .msp
            .verify_signed(creator, &request.payload, &request.signature)?;

        if action.tx_id != compute_transaction_id(&action.nonce, &creator.encode_to_vec()) {
            return Err(CryptoError::TransactionIdMismatch.into());
        }

        if channel.ledger.is_committed(&action.tx_id).await {
            return Err(LedgerPeerError::DuplicateTransaction(action.tx_id));
        }

        let installed = channel.chaincodes.contains_key(&action.chaincode_id);
        let rejection = if !installed || action.rw_set.is_none() {
            Some(TxValidationCode::BadPayload)
        } else if let Err(e) = context.verify_endorsement(&prepared) {
            warn!("Endorsement rejected: {}", e);
            Some(TxValidationCode::EndorsementPolicyFailure)
        } else {
            None
        };

        let tx_id = action.tx_id.clone();
        let status = channel
            .ledger
            .commit(PendingTransaction {
                tx_id: action.tx_id,
                chaincode: action.chaincode_id,
                payload: prepared.action_bytes,
                rw_set: action.rw_set.unwrap_or_default(),
                rejection,
            })
            .await?;
        info!("Transaction ordered into block {}.", status.block_number);

        Ok(SubmitResponse { tx_id })
    }
}
