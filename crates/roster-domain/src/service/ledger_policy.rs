//! Ledger Policy - Ordering and uniqueness rules for evaluations
//!
//! Storage keeps evaluations in insertion order. Everything a caller
//! reads goes through these rules:
//! 1. Output is sorted by year, most recent first
//! 2. At most one evaluation per year is ever returned
//! 3. If storage holds two evaluations for one year (a defect), the one
//!    written last wins and the breach is reported to the caller
//!
//! This is pure domain logic - no I/O, no async, no logging.
//! Adapters decide how to report a breach.

use std::collections::HashSet;

use crate::model::evaluation::PerformanceEvaluation;

/// One evaluation picked out of a stored collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// The winning evaluation
    pub evaluation: PerformanceEvaluation,
    /// Its index in storage order
    pub position: usize,
    /// How many other stored evaluations share its year
    pub shadowed: usize,
}

impl Selection {
    /// True when storage broke the one-per-year invariant
    pub fn is_invariant_breach(&self) -> bool {
        self.shadowed > 0
    }
}

/// A sorted, de-duplicated view of a stored collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerView {
    /// Evaluations sorted by year descending
    pub evaluations: Vec<PerformanceEvaluation>,
    /// Years that had more than one stored evaluation
    pub duplicate_years: Vec<i32>,
}

/// LedgerPolicy - stateless rules over an evaluation collection
#[derive(Debug, Default, Clone, Copy)]
pub struct LedgerPolicy;

impl LedgerPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Sort by year descending, keeping only the last-written entry per year
    pub fn view(&self, stored: &[PerformanceEvaluation]) -> LedgerView {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        let mut evaluations = Vec::with_capacity(stored.len());

        // Walk newest-written first so the first hit per year is the winner
        for evaluation in stored.iter().rev() {
            if seen.insert(evaluation.year()) {
                evaluations.push(*evaluation);
            } else if !duplicates.contains(&evaluation.year()) {
                duplicates.push(evaluation.year());
            }
        }

        evaluations.sort_by(|a, b| b.year().cmp(&a.year()));
        duplicates.sort_by(|a, b| b.cmp(a));

        LedgerView {
            evaluations,
            duplicate_years: duplicates,
        }
    }

    /// The evaluation with the highest year
    pub fn latest(&self, stored: &[PerformanceEvaluation]) -> Option<Selection> {
        let max_year = stored.iter().map(|e| e.year()).max()?;
        self.for_year(stored, max_year)
    }

    /// The evaluation for one year, if any
    pub fn for_year(&self, stored: &[PerformanceEvaluation], year: i32) -> Option<Selection> {
        let mut matches = stored
            .iter()
            .enumerate()
            .filter(|(_, e)| e.year() == year)
            .rev();

        let (position, evaluation) = matches.next()?;
        Some(Selection {
            evaluation: *evaluation,
            position,
            shadowed: matches.count(),
        })
    }

    /// Years with more than one stored evaluation
    pub fn duplicate_years(&self, stored: &[PerformanceEvaluation]) -> Vec<i32> {
        self.view(stored).duplicate_years
    }
}
