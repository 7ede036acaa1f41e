//! # Roster Domain Layer
//!
//! Sales personnel and their yearly performance evaluations,
//! as pure business logic with zero external dependencies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - SalesPerson (aggregate), PerformanceEvaluation││
//! │  │  repository/- Port traits: repository + performance ledger  ││
//! │  │  service/   - Ledger policy (ordering, one-per-year rule)   ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule
//!
//! **This crate has ZERO external dependencies.**
//!
//! Swapping the document store for another backend must not touch
//! anything in here.

pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use model::{
    evaluation::{PerformanceEvaluation, TraitScores, MAX_SCORE},
    sales_person::{SalesPerson, SalesPersonId, ValidationError},
};

pub use repository::{
    performance_ledger::{AppendOutcome, PerformanceLedger},
    sales_person_repository::{
        BulkRead, RepositoryError, SalesPersonRepository, SkippedRecord, SortBy,
    },
};

pub use service::ledger_policy::{LedgerPolicy, LedgerView, Selection};
