use async_trait::async_trait;
use booking_ledger::{
    infrastructure::logging,
    rpc::{CommitStatusResponse, SignedCommitStatusRequest},
};
use tracing::info;

use crate::{
    server::{state::StateStore, Context, Operation},
    LedgerPeerError,
};

/// Report the validation code of a transaction, waiting for it to be
/// committed if needed.
#[derive(Debug)]
pub(crate) struct CommitStatus;

#[async_trait]
impl<S: StateStore> Operation<S> for CommitStatus {
    type Request = SignedCommitStatusRequest;
    type Response = CommitStatusResponse;

    async fn operation(
        self,
        request: SignedCommitStatusRequest,
        context: &Context<S>,
    ) -> Result<CommitStatusResponse, LedgerPeerError> {
        let status_request = request.commit_status_request()?;
        logging::record_field("tx_id", &status_request.tx_id);

        let _ = context.msp.verify_signed(
            status_request.identity()?,
            &request.request,
            &request.signature,
        )?;
        let channel = context.channel(&status_request.channel_id)?;

        let status = channel
            .ledger
            .wait_for_status(&status_request.tx_id, context.config.commit_status_wait)
            .await?;
        info!("Transaction status: {:?}", status.validation_code);

        let mut response = CommitStatusResponse {
            block_number: status.block_number,
            ..Default::default()
        };
        response.set_result(status.validation_code);
        Ok(response)
    }
}
