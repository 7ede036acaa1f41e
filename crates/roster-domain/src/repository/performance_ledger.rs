//! Performance Ledger - Abstract access to a sales person's evaluations
//!
//! Evaluations are never addressed on their own. Every call names the
//! owning sales person first; the ledger finds the aggregate and works
//! on its embedded collection.

use core::future::Future;

use crate::model::evaluation::PerformanceEvaluation;
use crate::model::sales_person::SalesPersonId;
use crate::repository::sales_person_repository::RepositoryError;

/// What `append` did to the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// No evaluation existed for the year; the collection grew by one
    Appended,
    /// An evaluation for the year was overwritten in place
    Replaced,
}

/// Performance Ledger Trait
///
/// This is a PORT in hexagonal architecture.
///
/// Invariants every implementation must hold:
/// - at most one evaluation per year (append is an upsert by year)
/// - reads come back sorted by year, most recent first
/// - each mutation is one atomic update of the owning aggregate
pub trait PerformanceLedger: Send + Sync {
    /// Insert or replace the evaluation for `evaluation.year()`
    fn append(
        &self,
        id: SalesPersonId,
        evaluation: PerformanceEvaluation,
    ) -> impl Future<Output = Result<AppendOutcome, RepositoryError>> + Send;

    /// All evaluations, year descending. Empty if there are none.
    fn list_all(
        &self,
        id: SalesPersonId,
    ) -> impl Future<Output = Result<Vec<PerformanceEvaluation>, RepositoryError>> + Send;

    /// The evaluation for one year. A missing year is `Ok(None)`.
    fn list_by_year(
        &self,
        id: SalesPersonId,
        year: i32,
    ) -> impl Future<Output = Result<Option<PerformanceEvaluation>, RepositoryError>> + Send;

    /// The evaluation with the highest year
    ///
    /// Fails with `EvaluationNotFound` when the collection is empty.
    fn latest(
        &self,
        id: SalesPersonId,
    ) -> impl Future<Output = Result<PerformanceEvaluation, RepositoryError>> + Send;

    /// Remove the evaluation for one year. Returns the number removed (0 or 1).
    fn remove_by_year(
        &self,
        id: SalesPersonId,
        year: i32,
    ) -> impl Future<Output = Result<u64, RepositoryError>> + Send;

    /// Remove the evaluation with the highest year and return it
    ///
    /// Unlike `remove_by_year` this is not a silent no-op:
    /// an empty collection fails with `EvaluationNotFound`.
    fn remove_latest(
        &self,
        id: SalesPersonId,
    ) -> impl Future<Output = Result<PerformanceEvaluation, RepositoryError>> + Send;
}
