//! Document-backed Performance Ledger
//!
//! Evaluations live in the `performanceRecords` array of their owner's
//! document. Every mutation is a single conditional `update_one` on
//! that document, never a read-modify-write across calls:
//!
//! - append: set-in-place where the year exists, else push where it doesn't
//! - remove by year: pull by year
//! - remove latest: pull the exact element seen as latest, only if still there
//!
//! A conditional update that matches nothing either means the owner is
//! gone or a concurrent write changed the collection; the latter is retried.
//!
//! Duplicate years should never be stored, but reads tolerate them and
//! pick the last written. In that state `remove_latest` pulls by exact
//! value, so byte-identical duplicates of the latest year go together
//! while differing ones are left behind for the next call.

use roster_domain::{
    AppendOutcome, LedgerPolicy, PerformanceEvaluation, PerformanceLedger, RepositoryError,
    SalesPersonId, SalesPersonRepository, Selection,
};
use tracing::{debug, info, warn};

use super::document::{self, RECORDS_FIELD};
use super::sales_person::DocumentSalesPersonRepository;
use crate::store::{DocumentStore, Update};

/// Conditional updates attempted before reporting contention
const MAX_ATTEMPTS: usize = 8;

/// Performance ledger over the sales person documents
#[derive(Debug, Clone)]
pub struct DocumentPerformanceLedger<S> {
    repository: DocumentSalesPersonRepository<S>,
    policy: LedgerPolicy,
}

impl<S: DocumentStore> DocumentPerformanceLedger<S> {
    pub fn new(repository: DocumentSalesPersonRepository<S>) -> Self {
        Self {
            repository,
            policy: LedgerPolicy::new(),
        }
    }

    pub fn repository(&self) -> &DocumentSalesPersonRepository<S> {
        &self.repository
    }

    async fn stored(&self, id: SalesPersonId) -> Result<Vec<PerformanceEvaluation>, RepositoryError> {
        let person = self.repository.get_by_id(id).await?;
        Ok(person.evaluations().to_vec())
    }

    /// Turns a missed conditional update into NotFound when the owner is gone
    async fn ensure_exists(&self, id: SalesPersonId) -> Result<(), RepositoryError> {
        if self.repository.exists(id).await? {
            Ok(())
        } else {
            Err(RepositoryError::NotFound { id: id.to_string() })
        }
    }

    fn report_breach(&self, id: SalesPersonId, selection: &Selection) {
        if selection.is_invariant_breach() {
            warn!(
                id = %id,
                year = selection.evaluation.year(),
                shadowed = selection.shadowed,
                "Duplicate evaluations stored for one year; using the last written"
            );
        }
    }
}

impl<S: DocumentStore> PerformanceLedger for DocumentPerformanceLedger<S> {
    async fn append(
        &self,
        id: SalesPersonId,
        evaluation: PerformanceEvaluation,
    ) -> Result<AppendOutcome, RepositoryError> {
        if evaluation.sales_person_id() != id {
            return Err(RepositoryError::InvariantViolation {
                message: format!(
                    "evaluation for sales person {} appended to sales person {}",
                    evaluation.sales_person_id(),
                    id
                ),
            });
        }

        let store = self.repository.store();
        let collection = self.repository.collection();
        let value = document::evaluation_value(&evaluation)?;
        let year = document::year_predicate(evaluation.year());

        for attempt in 1..=MAX_ATTEMPTS {
            let replace = store
                .update_one(
                    collection,
                    &document::key_filter(id).element_match(RECORDS_FIELD, year.clone()),
                    &Update::new().set_element(RECORDS_FIELD, year.clone(), value.clone()),
                )
                .await?;
            if replace.matched > 0 {
                info!(id = %id, year = evaluation.year(), "Replaced performance evaluation");
                return Ok(AppendOutcome::Replaced);
            }

            let push = store
                .update_one(
                    collection,
                    &document::key_filter(id).no_element_match(RECORDS_FIELD, year.clone()),
                    &Update::new().push(RECORDS_FIELD, value.clone()),
                )
                .await?;
            if push.matched > 0 {
                info!(id = %id, year = evaluation.year(), "Appended performance evaluation");
                return Ok(AppendOutcome::Appended);
            }

            self.ensure_exists(id).await?;
            debug!(id = %id, attempt, "Year changed concurrently, retrying append");
        }

        Err(RepositoryError::ConcurrencyError { id: id.to_string() })
    }

    async fn list_all(&self, id: SalesPersonId) -> Result<Vec<PerformanceEvaluation>, RepositoryError> {
        let stored = self.stored(id).await?;
        let view = self.policy.view(&stored);

        if !view.duplicate_years.is_empty() {
            warn!(
                id = %id,
                years = ?view.duplicate_years,
                "Duplicate evaluations stored; listing the last written per year"
            );
        }
        Ok(view.evaluations)
    }

    async fn list_by_year(
        &self,
        id: SalesPersonId,
        year: i32,
    ) -> Result<Option<PerformanceEvaluation>, RepositoryError> {
        let stored = self.stored(id).await?;

        Ok(self.policy.for_year(&stored, year).map(|selection| {
            self.report_breach(id, &selection);
            selection.evaluation
        }))
    }

    async fn latest(&self, id: SalesPersonId) -> Result<PerformanceEvaluation, RepositoryError> {
        let stored = self.stored(id).await?;

        let selection = self
            .policy
            .latest(&stored)
            .ok_or_else(|| RepositoryError::EvaluationNotFound { id: id.to_string() })?;
        self.report_breach(id, &selection);
        Ok(selection.evaluation)
    }

    async fn remove_by_year(&self, id: SalesPersonId, year: i32) -> Result<u64, RepositoryError> {
        let result = self
            .repository
            .store()
            .update_one(
                self.repository.collection(),
                &document::key_filter(id),
                &Update::new().pull(RECORDS_FIELD, document::year_predicate(year)),
            )
            .await?;

        if result.matched == 0 {
            return Err(RepositoryError::NotFound { id: id.to_string() });
        }

        if result.modified > 0 {
            info!(id = %id, year, "Removed performance evaluation");
        } else {
            debug!(id = %id, year, "No performance evaluation to remove");
        }
        Ok(result.modified)
    }

    async fn remove_latest(&self, id: SalesPersonId) -> Result<PerformanceEvaluation, RepositoryError> {
        let store = self.repository.store();
        let collection = self.repository.collection();

        for attempt in 1..=MAX_ATTEMPTS {
            let stored = self.stored(id).await?;
            let selection = self
                .policy
                .latest(&stored)
                .ok_or_else(|| RepositoryError::EvaluationNotFound { id: id.to_string() })?;
            self.report_breach(id, &selection);

            // Only pull the element if it is still exactly what we saw
            let exact = document::evaluation_predicate(&selection.evaluation)?;
            let result = store
                .update_one(
                    collection,
                    &document::key_filter(id).element_match(RECORDS_FIELD, exact.clone()),
                    &Update::new().pull(RECORDS_FIELD, exact),
                )
                .await?;

            if result.matched > 0 {
                info!(
                    id = %id,
                    year = selection.evaluation.year(),
                    "Removed latest performance evaluation"
                );
                return Ok(selection.evaluation);
            }

            debug!(id = %id, attempt, "Latest evaluation changed concurrently, retrying");
        }

        Err(RepositoryError::ConcurrencyError { id: id.to_string() })
    }
}
