//! In-Memory Document Store
//!
//! Thread-safe store using RwLock. Each collection is a Vec of
//! documents in insertion order. Useful for testing and development,
//! and the backing cache of the file store.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use tracing::debug;

use super::{
    DeleteResult, Document, DocumentStore, Filter, FindOptions, StoreError, Update, UpdateResult,
    ID_FIELD,
};

pub(crate) type Collections = HashMap<String, Vec<Document>>;

/// In-memory Document Store
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<Collections>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Build a store pre-loaded with collections
    pub fn from_collections(collections: Collections) -> Self {
        Self {
            collections: Arc::new(RwLock::new(collections)),
        }
    }

    /// Copy of every collection, for persistence
    pub fn snapshot(&self) -> Result<Collections, StoreError> {
        Ok(self.read()?.clone())
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.collections.read().map_err(|_| StoreError::Lock)
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.collections.write().map_err(|_| StoreError::Lock)
    }

    // Sync primitives shared with the file store, which applies them
    // to a staged copy before publishing it.

    pub(crate) fn insert_locked(
        collections: &mut Collections,
        collection: &str,
        doc: Document,
    ) -> Result<(), StoreError> {
        let key = doc.get(ID_FIELD).cloned().ok_or(StoreError::MissingId)?;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| d.get(ID_FIELD) == Some(&key)) {
            return Err(StoreError::DuplicateKey {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }
        docs.push(doc);
        Ok(())
    }

    pub(crate) fn update_locked(
        collections: &mut Collections,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<UpdateResult, StoreError> {
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(UpdateResult::default());
        };
        let Some(doc) = docs.iter_mut().find(|d| filter.matches(d)) else {
            return Ok(UpdateResult::default());
        };

        // Apply to a copy so a failing mutation leaves the document untouched
        let mut updated = doc.clone();
        let modified = update.apply(&mut updated)?;
        *doc = updated;

        Ok(UpdateResult {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    pub(crate) fn delete_locked(
        collections: &mut Collections,
        collection: &str,
        filter: &Filter,
        many: bool,
    ) -> DeleteResult {
        let Some(docs) = collections.get_mut(collection) else {
            return DeleteResult::default();
        };

        let before = docs.len();
        if many {
            docs.retain(|d| !filter.matches(d));
        } else if let Some(pos) = docs.iter().position(|d| filter.matches(d)) {
            docs.remove(pos);
        }

        DeleteResult {
            deleted: (before - docs.len()) as u64,
        }
    }

    fn find_locked(
        collections: &Collections,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Vec<Document> {
        let matching = collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
            .unwrap_or_default();
        options.apply(matching)
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        debug!(collection, "insert_one");
        let mut collections = self.write()?;
        Self::insert_locked(&mut collections, collection, doc)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Option<Document>, StoreError> {
        debug!(collection, "find_one");
        let collections = self.read()?;
        let options = options.clone().with_limit(1);
        Ok(Self::find_locked(&collections, collection, filter, &options)
            .into_iter()
            .next())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        debug!(collection, "find");
        let collections = self.read()?;
        Ok(Self::find_locked(&collections, collection, filter, options))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<UpdateResult, StoreError> {
        debug!(collection, "update_one");
        let mut collections = self.write()?;
        Self::update_locked(&mut collections, collection, filter, update)
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError> {
        debug!(collection, "delete_one");
        let mut collections = self.write()?;
        Ok(Self::delete_locked(&mut collections, collection, filter, false))
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError> {
        debug!(collection, "delete_many");
        let mut collections = self.write()?;
        Ok(Self::delete_locked(&mut collections, collection, filter, true))
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let collections = self.read()?;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SortOrder;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one("salesmen", doc(json!({ "_id": 2, "lastname": "Doe" })))
            .await
            .unwrap();
        store
            .insert_one("salesmen", doc(json!({ "_id": 1, "lastname": "Smith" })))
            .await
            .unwrap();

        let all = store
            .find(
                "salesmen",
                &Filter::all(),
                &FindOptions::sorted(ID_FIELD, SortOrder::Ascending),
            )
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["lastname"], "Smith");

        let one = store
            .find_one("salesmen", &Filter::by("lastname", "Doe"), &FindOptions::default())
            .await
            .unwrap();
        assert_eq!(one.unwrap()[ID_FIELD], 2);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one("salesmen", doc(json!({ "_id": 1 })))
            .await
            .unwrap();

        let result = store.insert_one("salesmen", doc(json!({ "_id": 1 }))).await;

        assert!(matches!(result, Err(StoreError::DuplicateKey { .. })));
        assert_eq!(store.count("salesmen", &Filter::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_id_rejected() {
        let store = InMemoryDocumentStore::new();
        let result = store.insert_one("salesmen", doc(json!({ "sid": 1 }))).await;
        assert!(matches!(result, Err(StoreError::MissingId)));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one("c", doc(json!({ "_id": 1, "name": "a" })))
            .await
            .unwrap();

        let result = store
            .update_one("c", &Filter::by(ID_FIELD, 1), &Update::new().set("name", "b"))
            .await
            .unwrap();
        assert_eq!(result, UpdateResult { matched: 1, modified: 1 });

        let missing = store
            .update_one("c", &Filter::by(ID_FIELD, 9), &Update::new().set("name", "b"))
            .await
            .unwrap();
        assert_eq!(missing.matched, 0);

        let deleted = store.delete_many("c", &Filter::all()).await.unwrap();
        assert_eq!(deleted.deleted, 1);

        // Deleting again, or from an unknown collection, is a no-op
        assert_eq!(store.delete_one("c", &Filter::all()).await.unwrap().deleted, 0);
        assert_eq!(store.delete_many("nope", &Filter::all()).await.unwrap().deleted, 0);
    }

    #[tokio::test]
    async fn test_failed_update_leaves_document_untouched() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_one("c", doc(json!({ "_id": 1, "records": 5 })))
            .await
            .unwrap();

        let update = Update::new().set("name", "x").push("records", json!(1));
        let result = store.update_one("c", &Filter::by(ID_FIELD, 1), &update).await;
        assert!(matches!(result, Err(StoreError::Malformed(_))));

        let stored = store
            .find_one("c", &Filter::all(), &FindOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert!(stored.get("name").is_none());
    }
}
