//! Persistence Adapters - Repository implementations
//!
//! These implement the repository traits from roster-domain
//! on top of any `DocumentStore`.

pub mod document;
pub mod ledger;
pub mod sales_person;

pub use ledger::DocumentPerformanceLedger;
pub use sales_person::{DocumentSalesPersonRepository, DEFAULT_COLLECTION};
