//! Startup sequencing and graceful shutdown.
//!
//! Order on start: store client, app state (health checks), admin listener
//! (best effort, in the background), primary listener, then `Running`.
//! On the shutdown signal: `ShuttingDown` (readiness flips at once), stop
//! accepting, drain in-flight requests for at most the configured grace
//! period. Missing the deadline is a fatal error: requests still running are
//! abandoned (their handler futures are dropped and the client gets a `503`
//! with `Connection: close`), and the caller exits non-zero.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use counter_core::error::{CounterError, Result};
use counter_core::protocol::ErrorResponse;

use crate::app_state::AppState;
use crate::config::CounterConfig;
use crate::health::ServerStatus;
use crate::router;
use crate::store::RedisStore;

/// Run the service until `shutdown` resolves.
pub async fn run<S>(cfg: CounterConfig, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let store = Arc::new(RedisStore::new(&cfg.redis)?);
    store.warm_up();

    let state = AppState::new(cfg, store);
    serve(state, shutdown).await
}

/// Bind both listeners from config and serve `state`.
pub async fn serve<S>(state: AppState, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let admin_addr = SocketAddr::from(([0, 0, 0, 0], state.cfg().admin_port));
    let _admin = spawn_admin(admin_addr, state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.cfg().port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| CounterError::Startup(format!("bind {addr}: {e}")))?;

    serve_on(listener, state, shutdown).await
}

/// Bind and serve the admin router in the background. Failures are logged only.
pub fn spawn_admin(addr: SocketAddr, state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        let listener = match TcpListener::bind(addr).await {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(%addr, error = %e, "admin listener bind failed");
                return;
            }
        };
        serve_admin_on(listener, state).await;
    })
}

/// Serve the admin router on an already-bound listener until it fails.
pub async fn serve_admin_on(listener: TcpListener, state: AppState) {
    let addr = listener.local_addr().ok();
    tracing::info!(addr = ?addr, "starting admin server");
    if let Err(e) = axum::serve(listener, router::build_admin_router(state)).await {
        tracing::error!(error = %e, "admin server failed");
    }
}

/// Serve the counter router on an already-bound listener, with the
/// shutdown/drain sequence described in the module docs.
pub async fn serve_on<S>(listener: TcpListener, state: AppState, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| CounterError::Startup(format!("listener address: {e}")))?;
    tracing::info!(%addr, "starting HTTP");

    let (drain_tx, drain_rx) = oneshot::channel::<()>();
    let app = router::build_router(state.clone());
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = drain_rx.await;
            })
            .await
    });

    state.status().advance(ServerStatus::Running);
    tracing::info!("ready to serve requests");

    tokio::select! {
        _ = shutdown => {}
        exited = &mut server => {
            state.status().advance(ServerStatus::ShuttingDown);
            let reason = match exited {
                Ok(Ok(())) => "listener stopped unexpectedly".to_string(),
                Ok(Err(e)) => format!("listener failed: {e}"),
                Err(e) => format!("listener task failed: {e}"),
            };
            return Err(CounterError::Shutdown(reason));
        }
    }

    state.status().advance(ServerStatus::ShuttingDown);
    tracing::info!("shutting down");
    let _ = drain_tx.send(());

    let grace = state.cfg().graceful_shutdown_timeout;
    match tokio::time::timeout(grace, &mut server).await {
        Ok(Ok(Ok(()))) => {
            tracing::info!("graceful shutdown complete");
            Ok(())
        }
        Ok(Ok(Err(e))) => Err(CounterError::Shutdown(format!("listener shutdown failed: {e}"))),
        Ok(Err(e)) => Err(CounterError::Shutdown(format!("listener task failed: {e}"))),
        Err(_) => {
            state.abandon_in_flight();
            server.abort();
            Err(CounterError::Shutdown(format!(
                "graceful shutdown timed out after {}",
                humantime::format_duration(grace)
            )))
        }
    }
}

/// Race each request against the drain deadline; past it, drop the handler.
pub async fn abandon_on_deadline(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    tokio::select! {
        biased;
        _ = state.abandoned() => {
            tracing::warn!("request abandoned at shutdown deadline");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                [(header::CONNECTION, "close")],
                Json(ErrorResponse::new("request abandoned at shutdown deadline")),
            )
                .into_response()
        }
        res = next.run(req) => res,
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("signal received, starting graceful shutdown");
}
