//! Counter core: request validation, key derivation, response bodies, and errors.
//!
//! This crate holds the parts of the counter service that have no transport or
//! runtime dependencies: turning a raw query string into a validated
//! [`CounterRequest`], deriving the [`StorageKey`] a label is stored under, and
//! the error taxonomy shared with the service crate.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! All fallible paths surface as `CounterError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod key;
pub mod protocol;
pub mod request;

pub use error::{CounterError, Result, StoreError, ValidationError};
pub use key::{KeyNamer, StorageKey};
pub use request::{CounterRequest, DEFAULT_LABEL};
