//! Salient Common Utilities
//!
//! Shared infrastructure for all Salient crates:
//! - Error types and result aliases
//! - Tick clock and rate limiting for the driving loop
//! - Tracing/logging initialization
//! - Application configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
