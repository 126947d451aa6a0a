//! Storage key derivation.
//!
//! Keys have the form `<prefix>.next.<label>`. The `.` separator and the `%`
//! escape character are percent-escaped inside the label part, so two distinct
//! labels never map to the same key.

use std::fmt;

/// Fixed namespace between the configured prefix and the label.
pub const NAMESPACE: &str = "next";

const SEPARATOR: char = '.';

/// Fully-qualified key under which a label's value lives in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derives storage keys from labels. Built once at startup from config.
#[derive(Debug, Clone)]
pub struct KeyNamer {
    prefix: String,
}

impl KeyNamer {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn derive_key(&self, label: &str) -> StorageKey {
        let mut key = String::with_capacity(self.prefix.len() + NAMESPACE.len() + label.len() + 2);
        key.push_str(&self.prefix);
        key.push(SEPARATOR);
        key.push_str(NAMESPACE);
        key.push(SEPARATOR);
        for c in label.chars() {
            match c {
                '%' => key.push_str("%25"),
                SEPARATOR => key.push_str("%2E"),
                c => key.push(c),
            }
        }
        StorageKey(key)
    }
}
