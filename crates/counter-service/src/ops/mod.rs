//! Administrative HTTP endpoints.
//!
//! - `/live`    : liveness
//! - `/ready`   : readiness (`http` + `redis` checks)
//! - `/metrics` : Prometheus text format
//! - `/about`   : name, version, hostname
//!
//! `/live` and `/ready` answer `200` or `503` with `{}`; add `?full=1` for
//! per-check detail.

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use counter_core::request::parse_query;

use crate::app_state::AppState;
use crate::health::HealthReport;

/// `full=1` anywhere in the query asks for per-check detail. Repeats are fine;
/// an undecodable query just gets the short form.
fn wants_detail(query: Option<&str>) -> bool {
    query
        .and_then(|q| parse_query(q).ok())
        .is_some_and(|pairs| pairs.iter().any(|(k, v)| k == "full" && v == "1"))
}

pub async fn live(State(state): State<AppState>, RawQuery(q): RawQuery) -> Response {
    report_response(state.health().live(), wants_detail(q.as_deref()))
}

pub async fn ready(State(state): State<AppState>, RawQuery(q): RawQuery) -> Response {
    report_response(state.health().ready(), wants_detail(q.as_deref()))
}

fn report_response(report: HealthReport, detail: bool) -> Response {
    let code = if report.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = if detail {
        json!(report.checks)
    } else {
        json!({})
    };
    (code, Json(body)).into_response()
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().render(state.status().get());

    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

pub async fn about(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.about().clone())
}
