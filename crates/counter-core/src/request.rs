//! Inbound parameter parsing and validation.
//!
//! The label pattern is matched anywhere in the label (not anchored): a label
//! is accepted as soon as it contains one ASCII alphanumeric run, so
//! `"!!!abc!!!"` passes while `"!@#"` and `""` do not.

use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::error::ValidationError;

/// Label used when the request carries no `label` parameter.
pub const DEFAULT_LABEL: &str = "default";

const LABEL_PARAM: &str = "label";

#[allow(clippy::expect_used)]
static LABEL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("[a-zA-Z0-9]+").expect("label pattern is a valid literal"));

/// Validated counter request. Created per request, dropped after handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRequest {
    label: String,
}

impl CounterRequest {
    /// Parse and validate the raw (still percent-encoded) query string.
    ///
    /// Unknown parameters are ignored; if `label` is repeated the last value wins.
    pub fn from_query(query: Option<&str>) -> Result<Self, ValidationError> {
        let mut label = None;
        if let Some(q) = query {
            for (k, v) in parse_query(q)? {
                if k == LABEL_PARAM {
                    label = Some(v);
                }
            }
        }

        let label = label.unwrap_or_else(|| DEFAULT_LABEL.to_string());
        if !is_valid_label(&label) {
            return Err(ValidationError::InvalidLabel);
        }
        Ok(Self { label })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

pub fn is_valid_label(label: &str) -> bool {
    LABEL_PATTERN.is_match(label)
}

/// Split an `application/x-www-form-urlencoded` query into decoded pairs.
///
/// Strict about escapes: a `%` not followed by two hex digits is an error, as is
/// a `;` separator.
pub fn parse_query(query: &str) -> Result<Vec<(String, String)>, ValidationError> {
    let mut pairs = Vec::new();
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        if pair.contains(';') {
            return Err(ValidationError::Malformed(
                "invalid semicolon separator in query".into(),
            ));
        }
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        pairs.push((unescape(k)?, unescape(v)?));
    }
    Ok(pairs)
}

fn unescape(s: &str) -> Result<String, ValidationError> {
    if let Some(seq) = invalid_escape(s) {
        return Err(ValidationError::Malformed(format!(
            "invalid URL escape {seq:?}"
        )));
    }
    let spaced = s.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ValidationError::Malformed("invalid UTF-8 in query".into()))
}

/// First `%` not followed by two hex digits, with whatever follows it (up to two bytes).
fn invalid_escape(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    s.match_indices('%').find_map(|(i, _)| {
        let hex = bytes.get(i + 1..i + 3);
        if hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
            return None;
        }
        let end = (i + 3).min(bytes.len());
        Some(String::from_utf8_lossy(&bytes[i..end]).into_owned())
    })
}
