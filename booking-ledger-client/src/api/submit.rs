use crate::{api::Contract, LedgerClientError, Result};
use booking_ledger::{
    infrastructure::logging,
    rpc::{CommitStatusRequest, PreparedTransaction, TxValidationCode},
    BookingLedgerError,
};
use tracing::{debug, info, instrument};

/// A transaction endorsed by the peer but not yet submitted for ordering.
#[derive(Debug)]
pub struct Transaction {
    contract: Contract,
    tx_id: String,
    prepared: PreparedTransaction,
    result: Vec<u8>,
}

/// A transaction that has been submitted for ordering.
#[derive(Debug)]
pub struct Commit {
    contract: Contract,
    tx_id: String,
}

/// Final outcome of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitStatus {
    pub code: TxValidationCode,
    pub block_number: u64,
}

impl CommitStatus {
    pub fn is_valid(&self) -> bool {
        self.code == TxValidationCode::Valid
    }
}

impl Contract {
    /// Submit a transaction to the ledger and wait for it to be committed:
    /// 1. The peer endorses the signed proposal
    /// 2. The endorsed transaction is signed and submitted for ordering
    /// 3. The commit status is requested until the transaction is in a block
    ///
    /// A transaction committed with any status other than `VALID` is an
    /// error.
    ///
    /// Output: the payload returned by the contract during endorsement.
    #[instrument(skip_all, err(Debug), fields(transaction = transaction_name, tx_id))]
    pub async fn submit_transaction(
        &self,
        transaction_name: &str,
        args: &[String],
    ) -> Result<Vec<u8>> {
        let transaction = self.endorse(transaction_name, args).await?;
        logging::record_field("tx_id", &transaction.tx_id);

        let result = transaction.result.clone();
        let commit = transaction.submit().await?;
        let status = commit.status().await?;

        if !status.is_valid() {
            return Err(LedgerClientError::TransactionInvalid {
                tx_id: commit.tx_id,
                code: status.code,
            });
        }

        info!("Transaction committed in block {}.", status.block_number);
        Ok(result)
    }

    /// Have the peer simulate and endorse a transaction without submitting it.
    pub async fn endorse(&self, transaction_name: &str, args: &[String]) -> Result<Transaction> {
        let (tx_id, proposal) = self.signed_proposal(transaction_name, args).await;
        info!("Endorsing transaction {}.", tx_id);

        let endorsed = tokio::time::timeout(
            self.gateway().config().timeouts.endorse,
            self.gateway().tonic_client().endorse(proposal),
        )
        .await
        .map_err(|_| LedgerClientError::Timeout("endorse"))??
        .into_inner();

        let prepared = endorsed
            .prepared_transaction
            .ok_or(BookingLedgerError::MissingField("prepared_transaction"))?;
        let result = prepared.action()?.response_payload;
        debug!("Transaction endorsed.");

        Ok(Transaction {
            contract: self.clone(),
            tx_id,
            prepared,
            result,
        })
    }
}

impl Transaction {
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Payload returned by the contract during endorsement.
    pub fn result(&self) -> &[u8] {
        &self.result
    }

    /// Sign the endorsed transaction and submit it for ordering.
    pub async fn submit(self) -> Result<Commit> {
        let gateway = self.contract.gateway();
        let envelope = self.prepared.sign(gateway.signer());

        let _ = tokio::time::timeout(
            gateway.config().timeouts.submit,
            gateway.tonic_client().submit(envelope),
        )
        .await
        .map_err(|_| LedgerClientError::Timeout("submit"))??;
        debug!("Transaction {} submitted.", self.tx_id);

        Ok(Commit {
            contract: self.contract,
            tx_id: self.tx_id,
        })
    }
}

impl Commit {
    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Wait for the transaction to be committed and return its status.
    pub async fn status(&self) -> Result<CommitStatus> {
        let gateway = self.contract.gateway();
        let request =
            CommitStatusRequest::create(&self.tx_id, self.contract.channel(), gateway.identity())
                .sign(gateway.signer());

        let response = tokio::time::timeout(
            gateway.config().timeouts.commit_status,
            gateway.tonic_client().commit_status(request),
        )
        .await
        .map_err(|_| LedgerClientError::Timeout("commit status"))??
        .into_inner();

        Ok(CommitStatus {
            code: response.result(),
            block_number: response.block_number,
        })
    }
}
