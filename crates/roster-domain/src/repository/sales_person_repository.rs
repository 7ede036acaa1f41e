//! SalesPerson Repository - Abstract persistence for the roster
//!
//! This trait defines what operations the domain needs.
//! How they're implemented (document store, file, memory) is not our concern here.

use core::future::Future;

use crate::model::sales_person::{SalesPerson, SalesPersonId, ValidationError};

/// Errors that can occur during repository and ledger operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Sales person not found
    NotFound { id: String },
    /// The sales person exists but has no matching evaluation
    EvaluationNotFound { id: String },
    /// A sales person with this id already exists
    DuplicateKey { id: String },
    /// Stored or submitted data breaks a roster invariant
    InvariantViolation { message: String },
    /// The document store call failed
    StoreUnavailable { message: String },
    /// Concurrent modification kept winning
    ConcurrencyError { id: String },
}

impl RepositoryError {
    /// Both flavours of "absent" count as not found
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::NotFound { .. } | RepositoryError::EvaluationNotFound { .. }
        )
    }
}

impl core::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RepositoryError::NotFound { id } => {
                write!(f, "Sales person not found: {}", id)
            }
            RepositoryError::EvaluationNotFound { id } => {
                write!(f, "No performance evaluation found for sales person: {}", id)
            }
            RepositoryError::DuplicateKey { id } => {
                write!(f, "Sales person already exists: {}", id)
            }
            RepositoryError::InvariantViolation { message } => {
                write!(f, "Invariant violation: {}", message)
            }
            RepositoryError::StoreUnavailable { message } => {
                write!(f, "Document store unavailable: {}", message)
            }
            RepositoryError::ConcurrencyError { id } => {
                write!(f, "Concurrent modification for sales person: {}", id)
            }
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<ValidationError> for RepositoryError {
    fn from(err: ValidationError) -> Self {
        RepositoryError::InvariantViolation {
            message: err.to_string(),
        }
    }
}

/// Requested ordering for bulk reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    Id,
    LastName,
}

/// A stored record that could not be mapped during a bulk read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Whatever key the record carried, rendered as text
    pub key: String,
    pub reason: String,
}

/// Result of a bulk read: what mapped, and what was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRead<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedRecord>,
}

impl<T> BulkRead<T> {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl<T> Default for BulkRead<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

/// SalesPerson Repository Trait
///
/// This is a PORT in hexagonal architecture.
/// CRUD for the aggregate root. Evaluations are never touched here
/// except when a delete cascades to them.
///
/// Methods return `Send` futures so adapters can sit on a network store.
pub trait SalesPersonRepository: Send + Sync {
    /// Persist a new sales person with an empty evaluation collection
    fn create(
        &self,
        person: &SalesPerson,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Load the full aggregate
    fn get_by_id(
        &self,
        id: SalesPersonId,
    ) -> impl Future<Output = Result<SalesPerson, RepositoryError>> + Send;

    /// Load every aggregate, skipping records that fail to map
    fn get_all(
        &self,
        sort: Option<SortBy>,
    ) -> impl Future<Output = Result<BulkRead<SalesPerson>, RepositoryError>> + Send;

    /// Replace the name fields of an existing sales person
    fn update(
        &self,
        person: &SalesPerson,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove a sales person and everything it owns. Idempotent.
    fn delete_by_id(
        &self,
        id: SalesPersonId,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Remove every sales person. Returns how many were removed.
    fn delete_all(&self) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Count all sales persons
    fn count(&self) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Check if a sales person exists
    fn exists(
        &self,
        id: SalesPersonId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send {
        async move {
            match self.get_by_id(id).await {
                Ok(_) => Ok(true),
                Err(RepositoryError::NotFound { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        }
    }
}
