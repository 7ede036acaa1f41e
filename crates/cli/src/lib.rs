//! # Roster CLI
//!
//! Command implementations for the `roster` binary.

pub mod commands;
pub mod context;
pub mod output;
