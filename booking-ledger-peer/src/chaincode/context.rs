use booking_ledger::{
    crypto::X509Identity,
    rpc::{KvRead, KvWrite, RangeQueryInfo, ReadWriteSet},
};
use std::{collections::BTreeMap, sync::Arc};

use crate::{
    chaincode::ChaincodeError,
    server::state::{Height, Namespace, StateStore},
};

/// Simulation context for a single transaction.
///
/// Reads come from the committed world state, never from the transaction's
/// own pending writes. Every read records the version it observed so the
/// commit can detect that another transaction changed the key in between.
pub struct TransactionContext {
    state: Arc<dyn StateStore>,
    namespace: Namespace,
    tx_id: String,
    creator: X509Identity,
    reads: BTreeMap<String, Option<Height>>,
    writes: BTreeMap<String, KvWrite>,
    range_queries: Vec<RangeQueryInfo>,
}

impl TransactionContext {
    pub fn new(
        state: Arc<dyn StateStore>,
        namespace: Namespace,
        tx_id: impl Into<String>,
        creator: X509Identity,
    ) -> Self {
        Self {
            state,
            namespace,
            tx_id: tx_id.into(),
            creator,
            reads: BTreeMap::new(),
            writes: BTreeMap::new(),
            range_queries: Vec::new(),
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// The verified identity that created the transaction.
    pub fn creator(&self) -> &X509Identity {
        &self.creator
    }

    pub async fn get_state(&mut self, key: &str) -> Result<Option<Vec<u8>>, ChaincodeError> {
        let current = self.state.get_state(&self.namespace, key).await?;

        let version = current.as_ref().map(|value| value.version);
        let _ = self.reads.entry(key.to_string()).or_insert(version);

        Ok(current.map(|value| value.value))
    }

    pub fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), ChaincodeError> {
        if key.is_empty() {
            return Err(ChaincodeError::EmptyKey);
        }

        let _ = self.writes.insert(
            key.to_string(),
            KvWrite {
                key: key.to_string(),
                value,
                is_delete: false,
            },
        );
        Ok(())
    }

    /// Get every key in `[start, end)` ordered by key. Empty bounds are
    /// unbounded. The whole result is recorded so that commit can detect keys
    /// appearing in or vanishing from the range.
    pub async fn get_state_by_range(
        &mut self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, ChaincodeError> {
        let results = self
            .state
            .get_state_by_range(&self.namespace, start, end)
            .await?;

        self.range_queries.push(RangeQueryInfo {
            start_key: start.to_string(),
            end_key: end.to_string(),
            reads: results
                .iter()
                .map(|(key, value)| KvRead {
                    key: key.clone(),
                    version: Some(value.version.into()),
                })
                .collect(),
        });

        Ok(results
            .into_iter()
            .map(|(key, value)| (key, value.value))
            .collect())
    }

    pub fn into_read_write_set(self) -> ReadWriteSet {
        ReadWriteSet {
            reads: self
                .reads
                .into_iter()
                .map(|(key, version)| KvRead {
                    key,
                    version: version.map(Into::into),
                })
                .collect(),
            writes: self.writes.into_values().collect(),
            range_queries: self.range_queries,
        }
    }
}
