//! SalesPerson - The aggregate root of the roster
//!
//! SalesPerson is an Entity (has identity).
//! Every performance evaluation belongs to exactly one SalesPerson,
//! and all access to evaluations flows through it.

use super::evaluation::PerformanceEvaluation;

/// Unique identifier for a SalesPerson
///
/// Caller-assigned and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SalesPersonId(u32);

impl SalesPersonId {
    /// Create an id, rejecting zero
    pub fn new(id: u32) -> Result<Self, ValidationError> {
        if id == 0 {
            return Err(ValidationError::NonPositiveId);
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for SalesPersonId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// SalesPerson - A member of the sales roster
///
/// Owns its evaluations exclusively. The evaluations are kept
/// in storage (insertion) order; sorted views come from the ledger.
#[derive(Debug, Clone)]
pub struct SalesPerson {
    id: SalesPersonId,
    first_name: String,
    last_name: String,
    evaluations: Vec<PerformanceEvaluation>,
}

impl SalesPerson {
    /// Create a new SalesPerson with no evaluations
    pub fn new(
        id: SalesPersonId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        validate_name("first name", &first_name)?;
        validate_name("last name", &last_name)?;

        Ok(Self {
            id,
            first_name,
            last_name,
            evaluations: Vec::new(),
        })
    }

    /// Builder: attach evaluations already owned by this person
    ///
    /// Fails if any evaluation names a different owner.
    pub fn with_evaluations(
        mut self,
        evaluations: impl IntoIterator<Item = PerformanceEvaluation>,
    ) -> Result<Self, ValidationError> {
        for evaluation in evaluations {
            if evaluation.sales_person_id() != self.id {
                return Err(ValidationError::ForeignEvaluation {
                    owner: self.id.value(),
                    found: evaluation.sales_person_id().value(),
                });
            }
            self.evaluations.push(evaluation);
        }
        Ok(self)
    }

    // ========== Getters ==========

    pub fn id(&self) -> SalesPersonId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Evaluations in storage order
    pub fn evaluations(&self) -> &[PerformanceEvaluation] {
        &self.evaluations
    }

    // ========== Mutations ==========

    /// Rename this person
    pub fn rename(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        validate_name("first name", &first_name)?;
        validate_name("last name", &last_name)?;
        self.first_name = first_name;
        self.last_name = last_name;
        Ok(())
    }
}

impl PartialEq for SalesPerson {
    fn eq(&self, other: &Self) -> bool {
        // Entity equality: same ID = same entity
        self.id == other.id
    }
}

impl Eq for SalesPerson {}

fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    Ok(())
}

/// Errors raised when constructing roster values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Ids start at 1
    NonPositiveId,
    /// A name field was blank
    EmptyName { field: &'static str },
    /// A trait score fell outside [0, MAX_SCORE]
    ScoreOutOfRange { name: &'static str, value: i64 },
    /// An evaluation was attached to the wrong person
    ForeignEvaluation { owner: u32, found: u32 },
}

impl core::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ValidationError::NonPositiveId => write!(f, "Sales person id must be positive"),
            ValidationError::EmptyName { field } => write!(f, "The {} must not be empty", field),
            ValidationError::ScoreOutOfRange { name, value } => write!(
                f,
                "Score '{}' is {} but must be between 0 and {}",
                name,
                value,
                super::evaluation::MAX_SCORE
            ),
            ValidationError::ForeignEvaluation { owner, found } => write!(
                f,
                "Evaluation for sales person {} cannot be attached to sales person {}",
                found, owner
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
