//! Mapping between roster entities and stored documents
//!
//! Stored shape (one document per sales person):
//!
//! ```json
//! {
//!   "_id": 1001, "sid": 1001, "firstname": "John", "lastname": "Smith",
//!   "performanceRecords": [
//!     { "salesmanId": 1001, "leadership": 4, "openness": 3, "behaviour": 4,
//!       "attitude": 5, "communication": 4, "integrity": 4, "year": 2024 }
//!   ]
//! }
//! ```

use roster_domain::{
    PerformanceEvaluation, SalesPerson, SalesPersonId, TraitScores, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::store::{Document, Filter, StoreError, ID_FIELD};

pub const SID_FIELD: &str = "sid";
pub const FIRST_NAME_FIELD: &str = "firstname";
pub const LAST_NAME_FIELD: &str = "lastname";
pub const RECORDS_FIELD: &str = "performanceRecords";
pub const YEAR_FIELD: &str = "year";

/// Why a stored document could not become an entity
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("unexpected document shape: {0}")]
    Shape(#[from] serde_json::Error),

    #[error("stored values are invalid: {0}")]
    Invalid(#[from] ValidationError),

    #[error("_id ({key}) and sid ({sid}) disagree")]
    KeyMismatch { key: u32, sid: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SalesPersonDocument {
    #[serde(rename = "_id")]
    key: u32,
    sid: u32,
    firstname: String,
    lastname: String,
    #[serde(rename = "performanceRecords", default)]
    performance_records: Vec<EvaluationDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EvaluationDocument {
    salesman_id: u32,
    leadership: i64,
    openness: i64,
    behaviour: i64,
    attitude: i64,
    communication: i64,
    integrity: i64,
    year: i32,
}

impl From<&PerformanceEvaluation> for EvaluationDocument {
    fn from(e: &PerformanceEvaluation) -> Self {
        let s = e.scores();
        Self {
            salesman_id: e.sales_person_id().value(),
            leadership: s.leadership().into(),
            openness: s.openness().into(),
            behaviour: s.behaviour().into(),
            attitude: s.attitude().into(),
            communication: s.communication().into(),
            integrity: s.integrity().into(),
            year: e.year(),
        }
    }
}

impl EvaluationDocument {
    fn into_evaluation(self) -> Result<PerformanceEvaluation, MappingError> {
        let scores = TraitScores::new(
            self.leadership,
            self.openness,
            self.behaviour,
            self.attitude,
            self.communication,
            self.integrity,
        )?;
        Ok(PerformanceEvaluation::new(
            SalesPersonId::new(self.salesman_id)?,
            self.year,
            scores,
        ))
    }
}

/// Document for a newly created sales person; evaluations start empty
pub fn new_person_document(person: &SalesPerson) -> Result<Document, StoreError> {
    let doc = SalesPersonDocument {
        key: person.id().value(),
        sid: person.id().value(),
        firstname: person.first_name().to_string(),
        lastname: person.last_name().to_string(),
        performance_records: Vec::new(),
    };
    into_document(serde_json::to_value(doc)?)
}

/// Rebuild a full aggregate from its stored document
pub fn person_from_document(doc: Document) -> Result<SalesPerson, MappingError> {
    let stored: SalesPersonDocument = serde_json::from_value(Value::Object(doc))?;
    if stored.key != stored.sid {
        return Err(MappingError::KeyMismatch {
            key: stored.key,
            sid: stored.sid,
        });
    }

    let evaluations = stored
        .performance_records
        .into_iter()
        .map(EvaluationDocument::into_evaluation)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(
        SalesPerson::new(SalesPersonId::new(stored.sid)?, stored.firstname, stored.lastname)?
            .with_evaluations(evaluations)?,
    )
}

/// One evaluation as an array element
pub fn evaluation_value(evaluation: &PerformanceEvaluation) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(EvaluationDocument::from(evaluation))?)
}

/// The same element, usable as an exact-match predicate
pub fn evaluation_predicate(evaluation: &PerformanceEvaluation) -> Result<Document, StoreError> {
    into_document(evaluation_value(evaluation)?)
}

/// Predicate matching every element for one year
pub fn year_predicate(year: i32) -> Document {
    let mut predicate = Document::new();
    predicate.insert(YEAR_FIELD.to_string(), Value::from(year));
    predicate
}

/// Filter addressing one sales person document
pub fn key_filter(id: SalesPersonId) -> Filter {
    Filter::by(ID_FIELD, id.value())
}

/// Best-effort key of a document, for reporting
pub fn describe_key(doc: &Document) -> String {
    doc.get(ID_FIELD)
        .or_else(|| doc.get(SID_FIELD))
        .map(Value::to_string)
        .unwrap_or_else(|| "<no key>".to_string())
}

fn into_document(value: Value) -> Result<Document, StoreError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Malformed(format!(
            "expected an object, got {}",
            other
        ))),
    }
}
