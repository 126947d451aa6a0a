//! Redis-backed store (`INCR`).
//!
//! One `ConnectionManager` is opened at startup (or by the first request if
//! that attempt failed) and shared by every request task; it multiplexes
//! commands over a single connection and reconnects on its own (one attempt
//! per failure, no backoff loop) after the connection drops.

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{IntoConnectionInfo, RedisError};
use tokio::sync::OnceCell;

use counter_core::error::{CounterError, Result};
use counter_core::{StorageKey, StoreError};

use super::CounterStore;
use crate::config::RedisSection;

pub struct RedisStore {
    client: redis::Client,
    conn: OnceCell<ConnectionManager>,
}

impl RedisStore {
    pub fn new(cfg: &RedisSection) -> Result<Self> {
        let mut info = format!("redis://{}/{}", cfg.url, cfg.db)
            .into_connection_info()
            .map_err(|e| CounterError::Config(format!("redis connection info: {e}")))?;
        if !cfg.password.is_empty() {
            info.redis.password = Some(cfg.password.clone());
        }
        let client = redis::Client::open(info)
            .map_err(|e| CounterError::Config(format!("redis client: {e}")))?;

        Ok(Self {
            client,
            conn: OnceCell::new(),
        })
    }

    /// Open the shared connection in the background so the first request does not pay for it.
    pub fn warm_up(self: &Arc<Self>) {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            match store.connection().await {
                Ok(_) => tracing::info!("redis connection established"),
                Err(e) => tracing::warn!(error = %e, "redis not reachable at startup"),
            }
        });
    }

    async fn connection(&self) -> std::result::Result<ConnectionManager, StoreError> {
        self.conn
            .get_or_try_init(|| async {
                // No retries: a failed connect fails the request that triggered it.
                let config = ConnectionManagerConfig::new().set_number_of_retries(0);
                self.client.get_connection_manager_with_config(config).await
            })
            .await
            .cloned()
            .map_err(map_redis_err)
    }
}

#[async_trait]
impl CounterStore for RedisStore {
    async fn increment(&self, key: &StorageKey) -> std::result::Result<i64, StoreError> {
        let mut conn = self.connection().await?;
        let value: i64 = redis::cmd("INCR")
            .arg(key.as_str())
            .query_async(&mut conn)
            .await
            .map_err(map_redis_err)?;
        Ok(value)
    }
}

fn map_redis_err(e: RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_refusal() || e.is_timeout() || e.is_connection_dropped()
    {
        StoreError::Unavailable(e.to_string())
    } else {
        StoreError::OperationFailed(e.to_string())
    }
}
