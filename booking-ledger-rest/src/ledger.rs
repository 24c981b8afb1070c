use async_trait::async_trait;
use booking_ledger::types::TransactionName;
use booking_ledger_client::{Contract, LedgerClientError};

/// The ledger operations the REST handlers depend on.
#[async_trait]
pub trait Ledger: Send + Sync + 'static {
    /// Run a read-only transaction and return its payload.
    async fn evaluate_transaction(
        &self,
        transaction: TransactionName,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerClientError>;

    /// Commit a transaction to the ledger and return its payload.
    async fn submit_transaction(
        &self,
        transaction: TransactionName,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerClientError>;

    async fn health(&self) -> Result<(), LedgerClientError>;
}

#[async_trait]
impl Ledger for Contract {
    async fn evaluate_transaction(
        &self,
        transaction: TransactionName,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerClientError> {
        Contract::evaluate_transaction(self, transaction.as_ref(), args).await
    }

    async fn submit_transaction(
        &self,
        transaction: TransactionName,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerClientError> {
        Contract::submit_transaction(self, transaction.as_ref(), args).await
    }

    async fn health(&self) -> Result<(), LedgerClientError> {
        self.gateway().health().await
    }
}
