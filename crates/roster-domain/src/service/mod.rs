//! Domain Services - Business logic that doesn't belong to a single entity
//!
//! The ledger policy holds the rules every evaluation read must follow,
//! whatever store sits underneath.

pub mod ledger_policy;
