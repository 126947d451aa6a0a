//! Counter store capability.
//!
//! The handler only sees [`CounterStore`]; the read-modify-write of an
//! increment always happens inside the store, never in this process.

pub mod memory;
pub mod redis;

use async_trait::async_trait;

use counter_core::{StorageKey, StoreError};

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// Atomic "increment by one and return the new value" against a shared store.
///
/// Implementations must be safe to call concurrently from many request tasks
/// without external locking, and must not retry internally.
#[async_trait]
pub trait CounterStore: Send + Sync {
    async fn increment(&self, key: &StorageKey) -> Result<i64, StoreError>;
}
