//! JSON bodies returned by the counter and admin listeners.

use serde::Serialize;

/// Successful increment: `{"value": <int64>}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueResponse {
    pub value: i64,
}

/// Client-facing error: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Static process identity served on `/about`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AboutResponse {
    pub name: String,
    pub version: String,
    pub hostname: String,
}
