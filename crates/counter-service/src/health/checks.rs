//! Individual health checks.
//!
//! A [`Check`] answers synchronously. Slow probes (network dials) run as a
//! [`Probe`] inside an [`AsyncCheck`], which re-runs them on a timer in a
//! background task and serves the cached last result.

use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;

use super::status::{ServerStatus, StatusCell};

/// `Ok(())` when healthy, otherwise a human-readable reason.
pub type CheckResult = Result<(), String>;

pub trait Check: Send + Sync {
    fn check(&self) -> CheckResult;
}

impl<F> Check for F
where
    F: Fn() -> CheckResult + Send + Sync,
{
    fn check(&self) -> CheckResult {
        self()
    }
}

/// Ready only while the primary listener is serving.
pub struct HttpCheck {
    status: Arc<StatusCell>,
}

impl HttpCheck {
    pub fn new(status: Arc<StatusCell>) -> Self {
        Self { status }
    }
}

impl Check for HttpCheck {
    fn check(&self) -> CheckResult {
        match self.status.get() {
            ServerStatus::Running => Ok(()),
            other => Err(format!("HTTP server is {other}")),
        }
    }
}

#[async_trait]
pub trait Probe: Send + Sync + 'static {
    async fn probe(&self) -> CheckResult;
}

/// Healthy if a TCP connection to `addr` opens within `timeout`.
pub struct TcpDialProbe {
    addr: String,
    timeout: Duration,
}

impl TcpDialProbe {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Probe for TcpDialProbe {
    async fn probe(&self) -> CheckResult {
        match tokio::time::timeout(self.timeout, TcpStream::connect(&self.addr)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(format!("dial tcp {}: {e}", self.addr)),
            Err(_) => Err(format!("dial tcp {}: i/o timeout", self.addr)),
        }
    }
}

const NO_RESULT_YET: &str = "no result yet";

/// Cached result of a probe that runs every `interval` in the background.
///
/// The background task stops on its own once the `AsyncCheck` is dropped.
pub struct AsyncCheck {
    last: Arc<RwLock<CheckResult>>,
}

impl AsyncCheck {
    /// Start probing immediately. Must be called from within a tokio runtime.
    pub fn spawn<P: Probe>(name: &'static str, probe: P, interval: Duration) -> Self {
        let last = Arc::new(RwLock::new(Err(NO_RESULT_YET.to_string())));
        tokio::spawn(run_probe(name, probe, interval, Arc::downgrade(&last)));
        Self { last }
    }
}

impl Check for AsyncCheck {
    fn check(&self) -> CheckResult {
        self.last.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

async fn run_probe<P: Probe>(
    name: &'static str,
    probe: P,
    interval: Duration,
    last: Weak<RwLock<CheckResult>>,
) {
    let mut tick = tokio::time::interval(interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tick.tick().await;
        let result = probe.probe().await;

        let Some(cell) = last.upgrade() else { break };
        let mut slot = cell.write().unwrap_or_else(|e| e.into_inner());
        match (&*slot, &result) {
            (Ok(()), Err(e)) => tracing::warn!(check = name, error = %e, "health check failing"),
            (Err(_), Ok(())) => tracing::info!(check = name, "health check passing"),
            _ => {}
        }
        *slot = result;
    }
}
