//! SalesPersonRepository behaviour over the in-memory document store

use std::sync::Arc;

use roster_adapter::store::{DocumentStore, Filter, FindOptions};
use roster_adapter::{DocumentSalesPersonRepository, InMemoryDocumentStore};
use roster_domain::{RepositoryError, SalesPerson, SalesPersonId, SalesPersonRepository, SortBy};
use serde_json::json;

fn id(raw: u32) -> SalesPersonId {
    SalesPersonId::new(raw).unwrap()
}

fn person(raw: u32, first: &str, last: &str) -> SalesPerson {
    SalesPerson::new(id(raw), first, last).unwrap()
}

fn setup() -> (Arc<InMemoryDocumentStore>, DocumentSalesPersonRepository<InMemoryDocumentStore>) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let repo = DocumentSalesPersonRepository::new(Arc::clone(&store));
    (store, repo)
}

#[tokio::test]
async fn test_create_and_get_by_id() {
    let (_, repo) = setup();

    repo.create(&person(1001, "John", "Smith")).await.unwrap();

    let found = repo.get_by_id(id(1001)).await.unwrap();
    assert_eq!(found.first_name(), "John");
    assert_eq!(found.last_name(), "Smith");
    assert!(found.evaluations().is_empty());
}

#[tokio::test]
async fn test_create_duplicate_id_fails() {
    let (_, repo) = setup();
    repo.create(&person(1001, "John", "Smith")).await.unwrap();

    let err = repo.create(&person(1001, "Jane", "Doe")).await.unwrap_err();

    assert_eq!(err, RepositoryError::DuplicateKey { id: "1001".into() });
    assert_eq!(repo.get_by_id(id(1001)).await.unwrap().first_name(), "John");
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let (_, repo) = setup();

    let err = repo.get_by_id(id(42)).await.unwrap_err();

    assert_eq!(err, RepositoryError::NotFound { id: "42".into() });
    assert!(!repo.exists(id(42)).await.unwrap());
}

#[tokio::test]
async fn test_get_all_on_empty_store() {
    let (_, repo) = setup();

    let all = repo.get_all(None).await.unwrap();

    assert!(all.items.is_empty());
    assert!(all.is_complete());
}

#[tokio::test]
async fn test_get_all_sorted() {
    let (_, repo) = setup();
    repo.create(&person(3, "Carla", "Adams")).await.unwrap();
    repo.create(&person(1, "Bob", "Young")).await.unwrap();
    repo.create(&person(2, "Ann", "Miller")).await.unwrap();

    let by_id = repo.get_all(Some(SortBy::Id)).await.unwrap();
    let ids: Vec<_> = by_id.items.iter().map(|p| p.id().value()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let by_name = repo.get_all(Some(SortBy::LastName)).await.unwrap();
    let names: Vec<_> = by_name.items.iter().map(|p| p.last_name()).collect();
    assert_eq!(names, vec!["Adams", "Miller", "Young"]);
}

#[tokio::test]
async fn test_get_all_skips_malformed_records() {
    let (store, repo) = setup();
    repo.create(&person(1, "John", "Smith")).await.unwrap();
    store
        .insert_one(
            repo.collection(),
            json!({ "_id": 2, "sid": 2, "lastname": "NoFirstName" })
                .as_object()
                .cloned()
                .unwrap(),
        )
        .await
        .unwrap();

    let all = repo.get_all(None).await.unwrap();

    assert_eq!(all.items.len(), 1);
    assert_eq!(all.skipped.len(), 1);
    assert_eq!(all.skipped[0].key, "2");

    // A single read of the malformed record is an invariant violation, not a partial entity
    let err = repo.get_by_id(id(2)).await.unwrap_err();
    assert!(matches!(err, RepositoryError::InvariantViolation { .. }));
}

#[tokio::test]
async fn test_update_replaces_names_only() {
    let (store, repo) = setup();
    repo.create(&person(1001, "John", "Smith")).await.unwrap();
    store
        .update_one(
            repo.collection(),
            &Filter::by("_id", 1001),
            &roster_adapter::store::Update::new().push(
                "performanceRecords",
                json!({
                    "salesmanId": 1001, "leadership": 4, "openness": 3, "behaviour": 4,
                    "attitude": 5, "communication": 4, "integrity": 4, "year": 2024
                }),
            ),
        )
        .await
        .unwrap();

    repo.update(&person(1001, "Johnny", "Smyth")).await.unwrap();

    let found = repo.get_by_id(id(1001)).await.unwrap();
    assert_eq!(found.full_name(), "Johnny Smyth");
    assert_eq!(found.evaluations().len(), 1);
}

#[tokio::test]
async fn test_update_missing_is_not_found() {
    let (_, repo) = setup();

    let err = repo.update(&person(5, "No", "Body")).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_by_id_is_idempotent() {
    let (_, repo) = setup();
    repo.create(&person(1001, "John", "Smith")).await.unwrap();

    repo.delete_by_id(id(1001)).await.unwrap();
    repo.delete_by_id(id(1001)).await.unwrap();

    assert!(repo.get_by_id(id(1001)).await.unwrap_err().is_not_found());
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_all_is_idempotent() {
    let (store, repo) = setup();
    repo.create(&person(1, "A", "A")).await.unwrap();
    repo.create(&person(2, "B", "B")).await.unwrap();

    assert_eq!(repo.delete_all().await.unwrap(), 2);
    assert_eq!(repo.delete_all().await.unwrap(), 0);

    let left = store
        .find(repo.collection(), &Filter::all(), &FindOptions::default())
        .await
        .unwrap();
    assert!(left.is_empty());
}

#[tokio::test]
async fn test_custom_collection_is_isolated() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let main = DocumentSalesPersonRepository::new(Arc::clone(&store));
    let archive = DocumentSalesPersonRepository::new(Arc::clone(&store)).with_collection("archive");

    main.create(&person(1, "John", "Smith")).await.unwrap();

    assert_eq!(main.count().await.unwrap(), 1);
    assert_eq!(archive.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleted_id_is_not_reused() {
    let (store, repo) = setup();
    repo.create(&person(1001, "John", "Smith")).await.unwrap();
    repo.create(&person(1002, "Jane", "Doe")).await.unwrap();

    repo.delete_by_id(id(1001)).await.unwrap();
    let err = repo.create(&person(1001, "Johnny", "Smith")).await.unwrap_err();
    assert_eq!(err, RepositoryError::DuplicateKey { id: "1001".into() });

    repo.delete_all().await.unwrap();
    let err = repo.create(&person(1002, "Jane", "Doe")).await.unwrap_err();
    assert_eq!(err, RepositoryError::DuplicateKey { id: "1002".into() });
    assert_eq!(repo.count().await.unwrap(), 0);

    // Deleting an id that never existed does not retire it
    repo.delete_by_id(id(7)).await.unwrap();
    repo.create(&person(7, "Ann", "Lee")).await.unwrap();

    // A fresh repository starts a new session
    let next = DocumentSalesPersonRepository::new(store);
    next.create(&person(1001, "John", "Smith")).await.unwrap();
}
