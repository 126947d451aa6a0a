//! Counter endpoint: validate -> derive key -> increment -> render.
//!
//! Validation and store failures are both answered with `400` and
//! `{"error": "..."}`; no path here produces a 5xx.

use std::time::Instant;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use counter_core::error::{CounterError, Result};
use counter_core::protocol::{ErrorResponse, ValueResponse};
use counter_core::CounterRequest;

use crate::app_state::AppState;

pub async fn counter(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let (code, response) = match increment(&state, query.as_deref()).await {
        Ok(value) => (StatusCode::OK, Json(ValueResponse { value }).into_response()),
        Err(e) => {
            let code = status_for(&e);
            (code, (code, Json(ErrorResponse::new(e.to_string()))).into_response())
        }
    };
    state.metrics().requests.inc(&[("code", code.as_str())]);
    response
}

/// Run one increment for a raw query string. At most one store call is made,
/// and none when validation fails.
pub async fn increment(state: &AppState, query: Option<&str>) -> Result<i64> {
    let req = CounterRequest::from_query(query).map_err(|e| {
        tracing::debug!(error = %e, "rejected counter request");
        CounterError::from(e)
    })?;
    let key = state.key_namer().derive_key(req.label());

    let started = Instant::now();
    let outcome = state.store().increment(&key).await;
    state
        .metrics()
        .increment_duration
        .observe(&[("outcome", if outcome.is_ok() { "ok" } else { "error" })], started.elapsed());

    outcome.map_err(|e| {
        let e = CounterError::from(e);
        tracing::warn!(key = %key, error = %e, "increment failed");
        state.metrics().increment_errors.inc(&[("kind", e.kind())]);
        e
    })
}

/// HTTP status for an error raised while serving a counter request.
pub fn status_for(e: &CounterError) -> StatusCode {
    match e {
        CounterError::Validation(_) | CounterError::Store(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
