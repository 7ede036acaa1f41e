//! # Roster Adapter Layer
//!
//! Outbound adapters for the roster domain (Hexagonal Architecture).
//!
//! ## Structure
//!
//! - `store/` - The Document Store collaborator and its implementations
//! - `repository/` - Repository and ledger implementations over a store

pub mod repository;
pub mod store;

pub use repository::{DocumentPerformanceLedger, DocumentSalesPersonRepository};
pub use store::{
    file_system::FileDocumentStore, in_memory::InMemoryDocumentStore, timeout::TimeoutStore,
    Document, DocumentStore, StoreError,
};
