//! # Roster Shared
//!
//! Configuration, error and logging plumbing used by the roster binaries.

pub mod config;
pub mod error;
pub mod logging;

// Re-exports
pub use config::*;
pub use error::*;
pub use logging::init_logging;
