//! Top-level facade crate for the counter service.
//!
//! Re-exports the core primitives and the service library so users can depend on a single crate.

pub mod core {
    pub use counter_core::*;
}

pub mod service {
    pub use counter_service::*;
}
