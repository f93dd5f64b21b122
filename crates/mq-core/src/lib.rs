//! mq-core: shared error type, configuration, and typed identifiers.
//!
//! This crate is the foundational dependency for the other mq-* crates,
//! providing the unified [`Error`], application [`config::Config`], and
//! newtype codes for menu-domain keys.

pub mod config;
pub mod error;
pub mod ids;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::*;
