//! Contracts hosted by the peer.
//!
//! A [`Chaincode`] runs against a [`TransactionContext`] that simulates the
//! transaction over the committed world state and records what it read and
//! wrote. Nothing reaches the world state until the recorded read/write set
//! passes validation at commit time.

use async_trait::async_trait;
use booking_ledger::types::ArgumentError;
use std::sync::Arc;
use thiserror::Error;

use crate::{config::ContractKind, server::state::StateStoreError};

mod booking;
mod context;

pub use booking::BookingContract;
pub use context::TransactionContext;

#[derive(Debug, Error)]
pub enum ChaincodeError {
    #[error("the asset with ID {0} already exists")]
    AssetExists(String),
    #[error("the asset with ID {0} does not exist")]
    AssetNotFound(String),
    #[error("function {transaction} not found in contract {contract}")]
    UnknownTransaction {
        transaction: String,
        contract: &'static str,
    },
    #[error("failed to unmarshal invoice JSON: {0}")]
    InvalidDocument(serde_json::Error),
    #[error("failed to unmarshal asset {0}: {1}")]
    CorruptRecord(String, serde_json::Error),
    #[error("failed to marshal asset: {0}")]
    Serialization(serde_json::Error),
    #[error("key must not be empty")]
    EmptyKey,
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    #[error(transparent)]
    State(#[from] StateStoreError),
}

/// Logic invoked by transactions on a channel.
#[async_trait]
pub trait Chaincode: Send + Sync + 'static {
    /// Contract name used in error messages.
    fn name(&self) -> &'static str;

    /// Run `transaction` with its positional arguments and return the
    /// transaction's response payload.
    async fn invoke(
        &self,
        ctx: &mut TransactionContext,
        transaction: &str,
        args: &[String],
    ) -> Result<Vec<u8>, ChaincodeError>;
}

/// Instantiate the contract for the given kind.
pub fn chaincode_for(kind: ContractKind) -> Arc<dyn Chaincode> {
    match kind {
        ContractKind::Booking => Arc::new(BookingContract),
    }
}
