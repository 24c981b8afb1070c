//! The block log of a channel.
//!
//! Every submitted transaction lands in its own block, valid or not. Blocks
//! are chained by hash. A transaction's writes reach the world state only
//! when every read it recorded during simulation still matches the
//! committed versions.

use booking_ledger::{
    crypto::sha256,
    rpc::{RangeQueryInfo, ReadWriteSet, TxValidationCode},
};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::{watch, Mutex, RwLock};
use tracing::{info, instrument};

use crate::{
    server::state::{Height, Namespace, StateStore, StateStoreError, VersionedValue},
    LedgerPeerError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub number: u64,
    pub previous_hash: [u8; 32],
    pub data_hash: [u8; 32],
    pub tx_id: String,
    pub validation_code: TxValidationCode,
}

impl Block {
    pub fn hash(&self) -> [u8; 32] {
        let mut header = Vec::with_capacity(8 + 32 + 32);
        header.extend_from_slice(&self.number.to_be_bytes());
        header.extend_from_slice(&self.previous_hash);
        header.extend_from_slice(&self.data_hash);
        sha256(&header)
    }
}

/// Final outcome of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxStatus {
    pub validation_code: TxValidationCode,
    pub block_number: u64,
}

/// A transaction ready to be ordered into the log.
#[derive(Debug, Clone)]
pub struct PendingTransaction {
    pub tx_id: String,
    pub chaincode: String,
    /// Encoded transaction action, hashed into the block.
    pub payload: Vec<u8>,
    pub rw_set: ReadWriteSet,
    /// Set when the transaction already failed a check before ordering.
    pub rejection: Option<TxValidationCode>,
}

pub struct Ledger<S: StateStore> {
    channel: String,
    state: Arc<S>,
    blocks: RwLock<Vec<Block>>,
    statuses: RwLock<HashMap<String, TxStatus>>,
    /// Serializes validation with commit.
    commit_lock: Mutex<()>,
    /// Carries the height of the last committed block.
    committed: watch::Sender<u64>,
}

impl<S: StateStore> Ledger<S> {
    pub fn new(channel: impl Into<String>, state: Arc<S>) -> Self {
        let (committed, _) = watch::channel(0);
        Self {
            channel: channel.into(),
            state,
            blocks: RwLock::new(Vec::new()),
            statuses: RwLock::new(HashMap::new()),
            commit_lock: Mutex::new(()),
            committed,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub async fn height(&self) -> u64 {
        self.blocks.read().await.len() as u64
    }

    pub async fn blocks(&self) -> Vec<Block> {
        self.blocks.read().await.clone()
    }

    pub async fn status(&self, tx_id: &str) -> Option<TxStatus> {
        self.statuses.read().await.get(tx_id).copied()
    }

    pub async fn is_committed(&self, tx_id: &str) -> bool {
        self.statuses.read().await.contains_key(tx_id)
    }

    /// Validate the transaction against the current world state, append it to
    /// the log and apply its writes if it is valid.
    #[instrument(skip_all, err(Debug), fields(tx_id = %transaction.tx_id))]
    pub async fn commit(
        &self,
        transaction: PendingTransaction,
    ) -> Result<TxStatus, LedgerPeerError> {
        let _guard = self.commit_lock.lock().await;

        if self.is_committed(&transaction.tx_id).await {
            return Err(LedgerPeerError::DuplicateTransaction(transaction.tx_id));
        }

        let namespace = Namespace::new(&self.channel, &transaction.chaincode);
        let validation_code = match transaction.rejection {
            Some(code) => code,
            None => self.validate(&namespace, &transaction.rw_set).await?,
        };

        let (number, previous_hash) = {
            let blocks = self.blocks.read().await;
            let previous_hash = blocks.last().map(Block::hash).unwrap_or([0; 32]);
            (blocks.len() as u64, previous_hash)
        };

        if validation_code == TxValidationCode::Valid {
            let height = Height {
                block_num: number,
                tx_num: 0,
            };
            self.state
                .apply_updates(&namespace, &transaction.rw_set.writes, height)
                .await?;
        }

        let block = Block {
            number,
            previous_hash,
            data_hash: sha256(&transaction.payload),
            tx_id: transaction.tx_id.clone(),
            validation_code,
        };
        self.blocks.write().await.push(block);

        let status = TxStatus {
            validation_code,
            block_number: number,
        };
        let _ = self
            .statuses
            .write()
            .await
            .insert(transaction.tx_id, status);
        let _ = self.committed.send_replace(number + 1);

        info!("Committed block {} with status {:?}", number, validation_code);
        Ok(status)
    }

    /// Wait until the transaction is committed or `timeout` elapses.
    pub async fn wait_for_status(
        &self,
        tx_id: &str,
        timeout: Duration,
    ) -> Result<TxStatus, LedgerPeerError> {
        let mut committed = self.committed.subscribe();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if let Some(status) = self.status(tx_id).await {
                return Ok(status);
            }

            match tokio::time::timeout_at(deadline, committed.changed()).await {
                Ok(Ok(())) => continue,
                // The sender lives as long as the ledger, so only the timeout
                // can end the wait.
                Ok(Err(_)) | Err(_) => {
                    return Err(LedgerPeerError::CommitStatusTimeout(tx_id.to_string()))
                }
            }
        }
    }

    async fn validate(
        &self,
        namespace: &Namespace,
        rw_set: &ReadWriteSet,
    ) -> Result<TxValidationCode, StateStoreError> {
        for read in &rw_set.reads {
            let current = self.state.get_state(namespace, &read.key).await?;
            let current_version = current.map(|value| value.version);
            let read_version = read.version.clone().map(Height::from);

            if current_version != read_version {
                return Ok(TxValidationCode::MvccReadConflict);
            }
        }

        for query in &rw_set.range_queries {
            let current = self
                .state
                .get_state_by_range(namespace, &query.start_key, &query.end_key)
                .await?;

            if !same_range(&current, query) {
                return Ok(TxValidationCode::PhantomReadConflict);
            }
        }

        Ok(TxValidationCode::Valid)
    }
}

fn same_range(current: &[(String, VersionedValue)], query: &RangeQueryInfo) -> bool {
    current.len() == query.reads.len()
        && current.iter().zip(&query.reads).all(|((key, value), read)| {
            *key == read.key && Some(value.version) == read.version.clone().map(Height::from)
        })
}
