//! File-backed Document Store
//!
//! Keeps every collection in memory and rewrites one JSON file after
//! each mutation. A mutation is staged on a copy of the collections,
//! written to disk on the blocking pool, and only then made visible.
//! A failed write leaves both the file and the in-memory state as they
//! were.
//!
//! Writers queue on an async commit lock that stays held until the
//! staged state is swapped in, so a caller that times out never lets
//! the next writer start from stale data. A timed-out write may still
//! complete after the caller has seen `StoreError::Timeout`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::in_memory::{Collections, InMemoryDocumentStore};
use super::{
    DeleteResult, Document, DocumentStore, Filter, FindOptions, StoreError, Update, UpdateResult,
};

/// JSON file Document Store
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: Arc<PathBuf>,
    inner: InMemoryDocumentStore,
    commit: Arc<Mutex<()>>,
}

impl FileDocumentStore {
    /// Open a store, loading the file if it exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let collections: Collections = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            HashMap::new()
        };

        info!(
            path = %path.display(),
            collections = collections.len(),
            "Opened document file"
        );

        Ok(Self {
            path: Arc::new(path),
            inner: InMemoryDocumentStore::from_collections(collections),
            commit: Arc::new(Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stage `mutate` on a copy, persist the copy, then publish it
    ///
    /// `mutate` reports whether anything changed; unchanged calls skip the write.
    async fn commit<T, F>(&self, mutate: F) -> Result<T, StoreError>
    where
        T: Send,
        F: FnOnce(&mut Collections) -> Result<(T, bool), StoreError> + Send,
    {
        let guard = Arc::clone(&self.commit).lock_owned().await;

        let mut staged = self.inner.snapshot()?;
        let (result, changed) = mutate(&mut staged)?;
        if !changed {
            return Ok(result);
        }

        let bytes = serde_json::to_vec_pretty(&staged)?;
        let path = Arc::clone(&self.path);
        let inner = self.inner.clone();

        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            write_file(&path, &bytes)?;
            *inner.write()? = staged;
            Ok::<(), StoreError>(())
        })
        .await
        .map_err(|e| StoreError::Io(std::io::Error::other(e.to_string())))??;

        Ok(result)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Write-then-rename so a crash never leaves a half-written file
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;

    debug!(path = %path.display(), "Flushed document file");
    Ok(())
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn insert_one(&self, collection: &str, doc: Document) -> Result<(), StoreError> {
        self.commit(|staged| {
            InMemoryDocumentStore::insert_locked(staged, collection, doc)?;
            Ok(((), true))
        })
        .await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Option<Document>, StoreError> {
        self.inner.find_one(collection, filter, options).await
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.find(collection, filter, options).await
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> Result<UpdateResult, StoreError> {
        self.commit(|staged| {
            let result = InMemoryDocumentStore::update_locked(staged, collection, filter, update)?;
            Ok((result, result.modified > 0))
        })
        .await
    }

    async fn delete_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError> {
        self.commit(|staged| {
            let result = InMemoryDocumentStore::delete_locked(staged, collection, filter, false);
            Ok((result, result.deleted > 0))
        })
        .await
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<DeleteResult, StoreError> {
        self.commit(|staged| {
            let result = InMemoryDocumentStore::delete_locked(staged, collection, filter, true);
            Ok((result, result.deleted > 0))
        })
        .await
    }

    async fn count(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        self.inner.count(collection, filter).await
    }
}
