//! Repository Traits - The "Ports" of Hexagonal Architecture
//!
//! These traits define HOW the domain wants to persist data,
//! but NOT how it's actually done. That's the adapter's job.
//!
//! ```text
//! Domain Layer              │  Adapter Layer
//! ──────────────────────────┼──────────────────────────────
//! trait SalesPersonRepo     │  DocumentSalesPersonRepository
//!   fn create()             │
//!   fn get_by_id()          │
//! trait PerformanceLedger   │  DocumentPerformanceLedger
//!   fn append()             │
//! ```

pub mod performance_ledger;
pub mod sales_person_repository;
