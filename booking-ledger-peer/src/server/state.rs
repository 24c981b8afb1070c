//! World state for ledger peers.
//!
//! The world state holds the latest committed value of every key, per
//! channel and chaincode, together with the height of the transaction that
//! wrote it. Heights drive the read conflict checks run before every commit.

use async_trait::async_trait;
use booking_ledger::rpc;
use thiserror::Error;
use tonic::Status;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StateStoreError {
    #[error("Range start {0:?} is after range end {1:?}")]
    InvalidRange(String, String),
    #[error("An error occurred within the world state: {0}")]
    InternalStateError(String),
}

impl From<StateStoreError> for Status {
    fn from(err: StateStoreError) -> Self {
        Status::internal(err.to_string())
    }
}

/// Keys of different chaincodes on different channels never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    pub channel: String,
    pub chaincode: String,
}

impl Namespace {
    pub fn new(channel: impl Into<String>, chaincode: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            chaincode: chaincode.into(),
        }
    }
}

/// Position of a transaction in the block log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Height {
    pub block_num: u64,
    pub tx_num: u64,
}

impl From<Height> for rpc::Version {
    fn from(height: Height) -> Self {
        rpc::Version {
            block_num: height.block_num,
            tx_num: height.tx_num,
        }
    }
}

impl From<rpc::Version> for Height {
    fn from(version: rpc::Version) -> Self {
        Height {
            block_num: version.block_num,
            tx_num: version.tx_num,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: Height,
}

/// Defines the expected interface between a ledger peer and its world state.
#[async_trait]
pub trait StateStore: Send + Sync + 'static {
    /// Get the current value of `key`, or `None` if the key does not exist.
    async fn get_state(
        &self,
        namespace: &Namespace,
        key: &str,
    ) -> Result<Option<VersionedValue>, StateStoreError>;

    /// Get every key in `[start, end)` ordered by key. An empty `start` or
    /// `end` leaves that side of the range unbounded.
    async fn get_state_by_range(
        &self,
        namespace: &Namespace,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StateStoreError>;

    /// Apply every write of a transaction atomically, tagging surviving keys
    /// with `height`.
    async fn apply_updates(
        &self,
        namespace: &Namespace,
        writes: &[rpc::KvWrite],
        height: Height,
    ) -> Result<(), StateStoreError>;
}
