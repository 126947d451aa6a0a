//! Readiness and liveness tracking.
//!
//! Checks are registered by name at startup. Liveness runs only liveness
//! checks; readiness runs both sets, so anything that makes the process
//! "dead" also makes it "not ready". Every evaluation updates the
//! `counter_healthcheck_status` gauge.

pub mod checks;
pub mod status;

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::obs::metrics::CounterMetrics;

pub use checks::{AsyncCheck, Check, CheckResult, HttpCheck, Probe, TcpDialProbe};
pub use status::{ServerStatus, StatusCell};

/// Outcome of evaluating a set of checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub healthy: bool,
    /// Check name -> `"OK"` or the failure reason.
    pub checks: BTreeMap<String, String>,
}

pub struct Health {
    liveness: Vec<(String, Arc<dyn Check>)>,
    readiness: Vec<(String, Arc<dyn Check>)>,
    metrics: Arc<CounterMetrics>,
}

impl Health {
    pub fn new(metrics: Arc<CounterMetrics>) -> Self {
        Self {
            liveness: Vec::new(),
            readiness: Vec::new(),
            metrics,
        }
    }

    pub fn add_liveness_check(&mut self, name: impl Into<String>, check: Arc<dyn Check>) {
        self.liveness.push((name.into(), check));
    }

    pub fn add_readiness_check(&mut self, name: impl Into<String>, check: Arc<dyn Check>) {
        self.readiness.push((name.into(), check));
    }

    pub fn live(&self) -> HealthReport {
        self.evaluate(self.liveness.iter())
    }

    pub fn ready(&self) -> HealthReport {
        self.evaluate(self.liveness.iter().chain(self.readiness.iter()))
    }

    fn evaluate<'a>(
        &self,
        checks: impl Iterator<Item = &'a (String, Arc<dyn Check>)>,
    ) -> HealthReport {
        let mut report = HealthReport {
            healthy: true,
            checks: BTreeMap::new(),
        };
        for (name, check) in checks {
            let result = check.check();
            self.metrics
                .healthcheck_status
                .set(&[("check", name.as_str())], if result.is_ok() { 0 } else { 1 });
            let text = match result {
                Ok(()) => "OK".to_string(),
                Err(reason) => {
                    report.healthy = false;
                    reason
                }
            };
            report.checks.insert(name.clone(), text);
        }
        report
    }
}
