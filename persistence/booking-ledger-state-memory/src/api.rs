use async_trait::async_trait;
use booking_ledger::rpc::KvWrite;
use booking_ledger_peer::server::state::{
    Height, Namespace, StateStore, StateStoreError, VersionedValue,
};
use std::{
    collections::{BTreeMap, HashMap},
    ops::Bound,
};
use tokio::sync::RwLock;
use tracing::debug;

/// World state held in ordered maps, one per namespace. Range queries walk
/// keys in byte order.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    namespaces: RwLock<HashMap<Namespace, BTreeMap<String, VersionedValue>>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get_state(
        &self,
        namespace: &Namespace,
        key: &str,
    ) -> Result<Option<VersionedValue>, StateStoreError> {
        let namespaces = self.namespaces.read().await;
        Ok(namespaces
            .get(namespace)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    async fn get_state_by_range(
        &self,
        namespace: &Namespace,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, VersionedValue)>, StateStoreError> {
        if !start.is_empty() && !end.is_empty() && start > end {
            return Err(StateStoreError::InvalidRange(
                start.to_string(),
                end.to_string(),
            ));
        }

        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };
        let upper = if end.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Excluded(end.to_string())
        };

        let namespaces = self.namespaces.read().await;
        let results = match namespaces.get(namespace) {
            Some(entries) => entries
                .range((lower, upper))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
            None => Vec::new(),
        };

        Ok(results)
    }

    async fn apply_updates(
        &self,
        namespace: &Namespace,
        writes: &[KvWrite],
        height: Height,
    ) -> Result<(), StateStoreError> {
        let mut namespaces = self.namespaces.write().await;
        let entries = namespaces.entry(namespace.clone()).or_default();

        for write in writes {
            if write.is_delete {
                let _ = entries.remove(&write.key);
            } else {
                let _ = entries.insert(
                    write.key.clone(),
                    VersionedValue {
                        value: write.value.clone(),
                        version: height,
                    },
                );
            }
        }
        debug!(
            "Applied {} writes to {}/{}",
            writes.len(),
            namespace.channel,
            namespace.chaincode
        );

        Ok(())
    }
}
