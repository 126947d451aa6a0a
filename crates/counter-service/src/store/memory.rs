//! In-process store used to run the service without Redis (tests, local runs).

use async_trait::async_trait;
use dashmap::DashMap;

use counter_core::{StorageKey, StoreError};

use super::CounterStore;

#[derive(Default)]
pub struct MemoryStore {
    values: DashMap<String, i64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &StorageKey) -> Option<i64> {
        self.values.get(key.as_str()).map(|v| *v)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn increment(&self, key: &StorageKey) -> Result<i64, StoreError> {
        // The entry guard holds the shard lock, so the add is atomic per key.
        let mut entry = self.values.entry(key.as_str().to_string()).or_insert(0);
        let next = entry.checked_add(1).ok_or_else(|| {
            StoreError::OperationFailed("increment or decrement would overflow".into())
        })?;
        *entry = next;
        Ok(next)
    }
}
