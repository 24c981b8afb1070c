use crate::{api::Contract, LedgerClientError, Result};
use booking_ledger::infrastructure::logging;
use tracing::{info, instrument};

impl Contract {
    /// Run a transaction on the peer without recording it on the ledger.
    ///
    /// Output: the payload returned by the contract.
    #[instrument(skip_all, err(Debug), fields(transaction = transaction_name, tx_id))]
    pub async fn evaluate_transaction(
        &self,
        transaction_name: &str,
        args: &[String],
    ) -> Result<Vec<u8>> {
        let (tx_id, proposal) = self.signed_proposal(transaction_name, args).await;
        logging::record_field("tx_id", &tx_id);
        info!("Evaluating transaction.");

        let response = tokio::time::timeout(
            self.gateway().config().timeouts.evaluate,
            self.gateway().tonic_client().evaluate(proposal),
        )
        .await
        .map_err(|_| LedgerClientError::Timeout("evaluate"))??;

        info!("Transaction evaluated.");
        Ok(response.into_inner().payload)
    }
}
