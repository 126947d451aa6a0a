//! Shared fixtures for service integration tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Notify;
use tower::ServiceExt;

use counter_core::{StorageKey, StoreError};
use counter_service::app_state::AppState;
use counter_service::config::CounterConfig;
use counter_service::health::{CheckResult, Probe, ServerStatus};
use counter_service::store::{CounterStore, MemoryStore};

/// Probe with a fixed answer.
pub struct StaticProbe(pub CheckResult);

#[async_trait]
impl Probe for StaticProbe {
    async fn probe(&self) -> CheckResult {
        self.0.clone()
    }
}

/// Store that is always down.
pub struct FailingStore;

#[async_trait]
impl CounterStore for FailingStore {
    async fn increment(&self, _key: &StorageKey) -> Result<i64, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

/// Memory store that announces each call and then stalls for `delay`.
pub struct SlowStore {
    pub inner: MemoryStore,
    pub entered: Arc<Notify>,
    pub delay: Duration,
}

impl SlowStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStore::new(),
            entered: Arc::new(Notify::new()),
            delay,
        }
    }
}

#[async_trait]
impl CounterStore for SlowStore {
    async fn increment(&self, key: &StorageKey) -> Result<i64, StoreError> {
        self.entered.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.increment(key).await
    }
}

pub fn test_config() -> CounterConfig {
    let mut cfg = CounterConfig::default();
    cfg.port = 0;
    cfg.admin_port = 0;
    cfg.graceful_shutdown_timeout = Duration::from_secs(5);
    cfg
}

pub fn state_with(store: Arc<dyn CounterStore>) -> AppState {
    state_with_config(test_config(), store)
}

pub fn state_with_config(cfg: CounterConfig, store: Arc<dyn CounterStore>) -> AppState {
    AppState::with_store_probe(cfg, store, StaticProbe(Ok(())))
}

/// In-process request against a router.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let code = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    (code, String::from_utf8(bytes.to_vec()).unwrap())
}

/// Plain HTTP/1.1 GET over a fresh TCP connection.
pub async fn http_get(addr: SocketAddr, path: &str) -> (u16, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let req = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(req.as_bytes()).await.unwrap();

    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    let text = String::from_utf8(buf).unwrap();

    let code = text.split(' ').nth(1).unwrap().parse().unwrap();
    let body = text.split_once("\r\n\r\n").map(|(_, b)| b.to_string()).unwrap_or_default();
    (code, body)
}

pub async fn wait_for_status(state: &AppState, want: ServerStatus) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while state.status().get() != want {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("status not reached in time");
}

/// Poll `f` until it returns true or five seconds pass.
pub async fn eventually(mut f: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !f() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met in time");
}
