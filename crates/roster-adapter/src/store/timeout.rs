//! Call-level timeout for any Document Store
//!
//! Repositories never retry and never wait forever; a store call that
//! does not finish in time surfaces as `StoreError::Timeout`.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::{
    DeleteResult, Document, DocumentStore, Filter, FindOptions, StoreError, Update, UpdateResult,
};

/// Wraps a store so every call is bounded by `timeout`
#[derive(Debug, Clone)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: DocumentStore> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T, StoreError>> + Send,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                let ms = self.timeout.as_millis() as u64;
                warn!(op, timeout_ms = ms, "Document store call timed out");
                Err(StoreError::Timeout(ms))
            }
        }
    }
}

#[async_trait]
impl<S: DocumentStore> DocumentStore for TimeoutStore<S> {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        self.bounded("insert_one", self.inner.insert_one(collection, doc))
            .await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Option<Document>, StoreError> {
        self.bounded("find_one", self.inner.find_one(collection, filter, options))
            .await
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        self.bounded("find", self.inner.find(collection, filter, options))
            .await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<UpdateResult, StoreError> {
        self.bounded("update_one", self.inner.update_one(collection, filter, update))
            .await
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError> {
        self.bounded("delete_one", self.inner.delete_one(collection, filter))
            .await
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError> {
        self.bounded("delete_many", self.inner.delete_many(collection, filter))
            .await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        self.bounded("count", self.inner.count(collection, filter))
            .await
    }
}
