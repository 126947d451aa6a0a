//! Counter service binary.
//!
//! - Counter listener: `GET /?label=...` -> `{"value": n}`
//! - Admin listener: `/live`, `/ready`, `/metrics`, `/about`
//! - Config from environment (optionally layered over a YAML file)

use std::process::ExitCode;

use tracing_subscriber::{fmt, EnvFilter};

use counter_service::{config, lifecycle, VERSION};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = match config::load_from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "config load failed");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        version = VERSION,
        port = cfg.port,
        admin_port = cfg.admin_port,
        "counter starting"
    );

    match lifecycle::run(cfg, lifecycle::shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), "fatal");
            ExitCode::FAILURE
        }
    }
}
