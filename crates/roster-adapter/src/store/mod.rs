//! Document Store - The collaborator every repository sits on
//!
//! A collection-oriented store holding generic JSON documents.
//! Repositories only ever speak these primitives:
//!
//! - insert-one
//! - find-one / find-many by equality filter, with optional sort and limit
//! - update-one with a conditional filter and field-level mutations
//! - delete-one / delete-many by filter
//! - count
//!
//! One `update_one` call is applied atomically to one document.
//! That is what the ledger builds its per-aggregate atomicity on.

pub mod file_system;
pub mod in_memory;
pub mod timeout;

use std::cmp::Ordering;

use async_trait::async_trait;
use roster_domain::RepositoryError;
use serde_json::{Map, Value};
use thiserror::Error;

/// Generic key-value document shape
pub type Document = Map<String, Value>;

/// Field that holds a document's unique key
pub const ID_FIELD: &str = "_id";

/// Errors raised by a document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate key {key} in collection '{collection}'")]
    DuplicateKey { collection: String, key: String },

    #[error("Document is missing its '{}' field", ID_FIELD)]
    MissingId,

    #[error("Store call timed out after {0} ms")]
    Timeout(u64),

    #[error("Store lock poisoned")]
    Lock,

    #[error("Malformed store data: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for RepositoryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { key, .. } => RepositoryError::DuplicateKey { id: key },
            StoreError::Malformed(message) => RepositoryError::InvariantViolation { message },
            other => RepositoryError::StoreUnavailable {
                message: other.to_string(),
            },
        }
    }
}

/// Sort direction for find queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// A single filter condition
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Top-level field equals value
    Eq { field: String, value: Value },
    /// Array field holds at least one element matching every predicate field
    ElementMatch { field: String, predicate: Document },
    /// Array field holds no element matching the predicate
    NoElementMatch { field: String, predicate: Document },
}

/// Conjunction of conditions. The empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    /// Shorthand for a single equality condition
    pub fn by(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().eq(field, value)
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn element_match(mut self, field: impl Into<String>, predicate: Document) -> Self {
        self.conditions.push(Condition::ElementMatch {
            field: field.into(),
            predicate,
        });
        self
    }

    pub fn no_element_match(mut self, field: impl Into<String>, predicate: Document) -> Self {
        self.conditions.push(Condition::NoElementMatch {
            field: field.into(),
            predicate,
        });
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.conditions.iter().all(|c| match c {
            Condition::Eq { field, value } => doc.get(field) == Some(value),
            Condition::ElementMatch { field, predicate } => {
                elements(doc, field).any(|e| element_matches(e, predicate))
            }
            Condition::NoElementMatch { field, predicate } => {
                !elements(doc, field).any(|e| element_matches(e, predicate))
            }
        })
    }
}

fn elements<'a>(doc: &'a Document, field: &str) -> impl Iterator<Item = &'a Value> {
    doc.get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// True when every predicate field is present in `element` with an equal value
pub fn element_matches(element: &Value, predicate: &Document) -> bool {
    match element.as_object() {
        Some(obj) => predicate.iter().all(|(k, v)| obj.get(k) == Some(v)),
        None => false,
    }
}

/// A field-level mutation
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Overwrite top-level fields
    Set(Document),
    /// Append to an array field, creating it if needed
    Push { field: String, value: Value },
    /// Remove every array element matching the predicate
    Pull { field: String, predicate: Document },
    /// Overwrite every array element matching the predicate
    SetElement {
        field: String,
        predicate: Document,
        value: Value,
    },
}

/// Mutations applied together, in order, to one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    mutations: Vec<Mutation>,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fields = Document::new();
        fields.insert(field.into(), value.into());
        self.mutations.push(Mutation::Set(fields));
        self
    }

    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.mutations.push(Mutation::Push {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn pull(mut self, field: impl Into<String>, predicate: Document) -> Self {
        self.mutations.push(Mutation::Pull {
            field: field.into(),
            predicate,
        });
        self
    }

    pub fn set_element(
        mut self,
        field: impl Into<String>,
        predicate: Document,
        value: impl Into<Value>,
    ) -> Self {
        self.mutations.push(Mutation::SetElement {
            field: field.into(),
            predicate,
            value: value.into(),
        });
        self
    }

    /// Apply to a document in place. Returns true if anything changed.
    pub fn apply(&self, doc: &mut Document) -> Result<bool, StoreError> {
        let before = doc.clone();
        for mutation in &self.mutations {
            match mutation {
                Mutation::Set(fields) => {
                    for (k, v) in fields {
                        if k == ID_FIELD && doc.get(k) != Some(v) {
                            return Err(StoreError::Malformed(format!(
                                "cannot change '{}'",
                                ID_FIELD
                            )));
                        }
                        doc.insert(k.clone(), v.clone());
                    }
                }
                Mutation::Push { field, value } => {
                    array_mut(doc, field)?.push(value.clone());
                }
                Mutation::Pull { field, predicate } => {
                    if doc.contains_key(field) {
                        array_mut(doc, field)?.retain(|e| !element_matches(e, predicate));
                    }
                }
                Mutation::SetElement {
                    field,
                    predicate,
                    value,
                } => {
                    if !doc.contains_key(field) {
                        continue;
                    }
                    for element in array_mut(doc, field)?.iter_mut() {
                        if element_matches(element, predicate) {
                            *element = value.clone();
                        }
                    }
                }
            }
        }
        Ok(*doc != before)
    }
}

fn array_mut<'a>(doc: &'a mut Document, field: &str) -> Result<&'a mut Vec<Value>, StoreError> {
    doc.entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or_else(|| StoreError::Malformed(format!("field '{}' is not an array", field)))
}

/// Options for find queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub sort: Option<(String, SortOrder)>,
    pub limit: Option<usize>,
}

impl FindOptions {
    pub fn sorted(field: impl Into<String>, order: SortOrder) -> Self {
        Self {
            sort: Some((field.into(), order)),
            limit: None,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sort and truncate a result set
    pub fn apply(&self, mut docs: Vec<Document>) -> Vec<Document> {
        if let Some((field, order)) = &self.sort {
            // Stable sort: equal keys keep insertion order
            docs.sort_by(|a, b| {
                let ord = compare_values(a.get(field), b.get(field));
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            });
        }
        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }
        docs
    }
}

/// Order for sort keys: missing < null < bool < number < string < other
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(_) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Outcome of an update call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
}

/// Outcome of a delete call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteResult {
    pub deleted: u64,
}

/// Document Store Trait
///
/// Every store is shared between tasks, so all calls take `&self`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document. Fails with `DuplicateKey` if its `_id` is taken.
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError>;

    /// First document matching the filter, after sorting
    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Option<Document>, StoreError>;

    /// All documents matching the filter
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError>;

    /// Apply `update` to the first matching document, atomically
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<UpdateResult, StoreError>;

    async fn delete_one(&self, collection: &str, filter: &Filter)
        -> Result<DeleteResult, StoreError>;

    async fn delete_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError>;

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;
}
