//! Counter service library entry.
//!
//! Wires config, the store capability, the counter handler, health tracking,
//! metrics, and the lifecycle coordinator. Consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod app_state;
pub mod config;
pub mod handler;
pub mod health;
pub mod lifecycle;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;

/// Build version, injected via `COUNTER_VERSION` at compile time.
pub const VERSION: &str = match option_env!("COUNTER_VERSION") {
    Some(v) => v,
    None => "dev",
};
