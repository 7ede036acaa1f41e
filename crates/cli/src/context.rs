//! Wiring from configuration to repositories

use std::sync::Arc;

use roster_adapter::store::DocumentStore;
use roster_adapter::{
    DocumentPerformanceLedger, DocumentSalesPersonRepository, FileDocumentStore,
    InMemoryDocumentStore, TimeoutStore,
};
use shared::RosterConfig;

/// Repository and ledger sharing one store
pub struct Roster<S> {
    pub store: Arc<S>,
    pub people: DocumentSalesPersonRepository<S>,
    pub ledger: DocumentPerformanceLedger<S>,
}

impl<S: DocumentStore> Roster<S> {
    pub fn new(store: Arc<S>, config: &RosterConfig) -> Self {
        let people = DocumentSalesPersonRepository::new(Arc::clone(&store))
            .with_collection(config.collection_namespace());
        let ledger = DocumentPerformanceLedger::new(people.clone());
        Self {
            store,
            people,
            ledger,
        }
    }
}

pub fn memory_store(config: &RosterConfig) -> Arc<TimeoutStore<InMemoryDocumentStore>> {
    Arc::new(TimeoutStore::new(
        InMemoryDocumentStore::new(),
        config.call_timeout(),
    ))
}

pub fn file_store(config: &RosterConfig) -> anyhow::Result<Arc<TimeoutStore<FileDocumentStore>>> {
    let store = FileDocumentStore::open(&config.data_file)?;
    tracing::debug!(path = %store.path().display(), "Opened data file");
    Ok(Arc::new(TimeoutStore::new(store, config.call_timeout())))
}
