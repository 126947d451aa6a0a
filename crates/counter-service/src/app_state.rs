//! Shared application state.
//!
//! Everything a request or an admin endpoint needs is built once at startup
//! and handed out through this cheap-to-clone handle: config, key namer,
//! store capability, lifecycle status, health registry, metrics, about info.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use counter_core::protocol::AboutResponse;
use counter_core::KeyNamer;

use crate::config::CounterConfig;
use crate::health::{AsyncCheck, Health, HttpCheck, Probe, StatusCell, TcpDialProbe};
use crate::obs::metrics::CounterMetrics;
use crate::store::CounterStore;
use crate::VERSION;

const SERVICE_NAME: &str = "counter";

/// How often the store reachability probe re-runs.
pub const STORE_PROBE_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: CounterConfig,
    key_namer: KeyNamer,
    store: Arc<dyn CounterStore>,
    status: Arc<StatusCell>,
    health: Health,
    metrics: Arc<CounterMetrics>,
    about: AboutResponse,
    /// Flips to `true` once the drain deadline has passed.
    abandon: watch::Sender<bool>,
}

impl AppState {
    /// Build state with the standard readiness checks: `http` and a TCP probe
    /// of the configured store address. Must be called from within a tokio runtime.
    pub fn new(cfg: CounterConfig, store: Arc<dyn CounterStore>) -> Self {
        let probe = TcpDialProbe::new(
            cfg.redis.url.clone(),
            cfg.redis.healthy_connect_timeout_threshold,
        );
        Self::with_store_probe(cfg, store, probe)
    }

    /// Same as [`AppState::new`] with a caller-supplied store probe.
    pub fn with_store_probe<P: Probe>(
        cfg: CounterConfig,
        store: Arc<dyn CounterStore>,
        probe: P,
    ) -> Self {
        let status = Arc::new(StatusCell::new());
        let metrics = Arc::new(CounterMetrics::default());

        let mut health = Health::new(Arc::clone(&metrics));
        health.add_readiness_check("http", Arc::new(HttpCheck::new(Arc::clone(&status))));
        health.add_readiness_check(
            "redis",
            Arc::new(AsyncCheck::spawn("redis", probe, STORE_PROBE_INTERVAL)),
        );

        let key_namer = KeyNamer::new(cfg.redis.prefix.clone());
        let (abandon, _) = watch::channel(false);
        let about = AboutResponse {
            name: SERVICE_NAME.to_string(),
            version: VERSION.to_string(),
            hostname: resolve_hostname(),
        };

        Self {
            inner: Arc::new(AppStateInner {
                cfg,
                key_namer,
                store,
                status,
                health,
                metrics,
                about,
                abandon,
            }),
        }
    }

    pub fn cfg(&self) -> &CounterConfig {
        &self.inner.cfg
    }

    pub fn key_namer(&self) -> &KeyNamer {
        &self.inner.key_namer
    }

    pub fn store(&self) -> &dyn CounterStore {
        self.inner.store.as_ref()
    }

    pub fn status(&self) -> &StatusCell {
        &self.inner.status
    }

    pub fn health(&self) -> &Health {
        &self.inner.health
    }

    pub fn metrics(&self) -> &CounterMetrics {
        &self.inner.metrics
    }

    pub fn about(&self) -> &AboutResponse {
        &self.inner.about
    }

    /// Tell every in-flight request to give up.
    pub fn abandon_in_flight(&self) {
        self.inner.abandon.send_replace(true);
    }

    /// Resolves once [`AppState::abandon_in_flight`] has been called.
    pub async fn abandoned(&self) {
        let mut rx = self.inner.abandon.subscribe();
        if rx.wait_for(|abandon| *abandon).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn resolve_hostname() -> String {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned())
        .filter(|h| !h.is_empty())
        .or_else(|| std::env::var("HOSTNAME").ok().filter(|h| !h.is_empty()))
        .unwrap_or_else(|| "localhost".to_string())
}
