//! Document-backed SalesPerson Repository

use std::collections::HashSet;
use std::sync::Arc;

use roster_domain::{
    BulkRead, RepositoryError, SalesPerson, SalesPersonId, SalesPersonRepository, SkippedRecord,
    SortBy,
};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::document::{self, FIRST_NAME_FIELD, LAST_NAME_FIELD};
use crate::store::{DocumentStore, Filter, FindOptions, SortOrder, StoreError, Update, ID_FIELD};

/// Collection used when none is configured
pub const DEFAULT_COLLECTION: &str = "salesmen";

/// SalesPerson repository over any Document Store
///
/// The store handle is passed in; its lifecycle belongs to the caller.
///
/// Ids deleted through this repository (or any clone of it) are retired
/// for the rest of its lifetime: `create` refuses them with `DuplicateKey`.
/// Creates and deletes are serialized on the retired set so the check and
/// the store call cannot interleave.
#[derive(Debug)]
pub struct DocumentSalesPersonRepository<S> {
    store: Arc<S>,
    collection: String,
    retired: Arc<Mutex<HashSet<SalesPersonId>>>,
}

// Manual impl: cloning shares the store, so S itself need not be Clone
impl<S> Clone for DocumentSalesPersonRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
            retired: Arc::clone(&self.retired),
        }
    }
}

impl<S: DocumentStore> DocumentSalesPersonRepository<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            collection: DEFAULT_COLLECTION.to_string(),
            retired: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Builder: use a different collection name
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}

impl<S: DocumentStore> SalesPersonRepository for DocumentSalesPersonRepository<S> {
    async fn create(&self, person: &SalesPerson) -> Result<(), RepositoryError> {
        let doc = document::new_person_document(person)?;

        let retired = self.retired.lock().await;
        if retired.contains(&person.id()) {
            debug!(id = %person.id(), "Refusing to reuse a deleted id");
            return Err(RepositoryError::DuplicateKey {
                id: person.id().to_string(),
            });
        }

        match self.store.insert_one(&self.collection, doc).await {
            Ok(()) => {
                info!(id = %person.id(), name = %person.full_name(), "Created sales person");
                Ok(())
            }
            Err(StoreError::DuplicateKey { .. }) => Err(RepositoryError::DuplicateKey {
                id: person.id().to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_by_id(&self, id: SalesPersonId) -> Result<SalesPerson, RepositoryError> {
        let doc = self
            .store
            .find_one(&self.collection, &document::key_filter(id), &FindOptions::default())
            .await?
            .ok_or_else(|| RepositoryError::NotFound { id: id.to_string() })?;

        document::person_from_document(doc).map_err(|e| RepositoryError::InvariantViolation {
            message: format!("sales person {}: {}", id, e),
        })
    }

    async fn get_all(&self, sort: Option<SortBy>) -> Result<BulkRead<SalesPerson>, RepositoryError> {
        let options = match sort {
            Some(SortBy::Id) => FindOptions::sorted(ID_FIELD, SortOrder::Ascending),
            Some(SortBy::LastName) => FindOptions::sorted(LAST_NAME_FIELD, SortOrder::Ascending),
            None => FindOptions::default(),
        };

        let docs = self
            .store
            .find(&self.collection, &Filter::all(), &options)
            .await?;

        let mut read = BulkRead::default();
        for doc in docs {
            let key = document::describe_key(&doc);
            match document::person_from_document(doc) {
                Ok(person) => read.items.push(person),
                Err(e) => {
                    // One bad record must not sink the whole read
                    warn!(key = %key, error = %e, "Skipping malformed sales person record");
                    read.skipped.push(SkippedRecord {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            found = read.items.len(),
            skipped = read.skipped.len(),
            "Read all sales persons"
        );
        Ok(read)
    }

    async fn update(&self, person: &SalesPerson) -> Result<(), RepositoryError> {
        let update = Update::new()
            .set(FIRST_NAME_FIELD, person.first_name())
            .set(LAST_NAME_FIELD, person.last_name());

        let result = self
            .store
            .update_one(&self.collection, &document::key_filter(person.id()), &update)
            .await?;

        if result.matched == 0 {
            return Err(RepositoryError::NotFound {
                id: person.id().to_string(),
            });
        }

        info!(id = %person.id(), "Updated sales person");
        Ok(())
    }

    async fn delete_by_id(&self, id: SalesPersonId) -> Result<(), RepositoryError> {
        let mut retired = self.retired.lock().await;
        let result = self
            .store
            .delete_one(&self.collection, &document::key_filter(id))
            .await?;

        if result.deleted > 0 {
            retired.insert(id);
            info!(id = %id, "Deleted sales person");
        } else {
            debug!(id = %id, "Nothing to delete");
        }
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepositoryError> {
        let mut retired = self.retired.lock().await;

        // No create can slip in between: it would need the retired lock
        let ids: Vec<SalesPersonId> = self
            .store
            .find(&self.collection, &Filter::all(), &FindOptions::default())
            .await?
            .iter()
            .filter_map(|doc| doc.get(ID_FIELD).and_then(Value::as_u64))
            .filter_map(|raw| u32::try_from(raw).ok())
            .filter_map(|raw| SalesPersonId::new(raw).ok())
            .collect();

        let result = self
            .store
            .delete_many(&self.collection, &Filter::all())
            .await?;
        retired.extend(ids);

        info!(deleted = result.deleted, "Deleted all sales persons");
        Ok(result.deleted)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.store.count(&self.collection, &Filter::all()).await?)
    }

    async fn exists(&self, id: SalesPersonId) -> Result<bool, RepositoryError> {
        let n = self
            .store
            .count(&self.collection, &document::key_filter(id))
            .await?;
        Ok(n > 0)
    }
}
