//! PerformanceLedger behaviour: upsert by year, ordering, latest,
//! removal asymmetry and per-aggregate atomicity.

use std::sync::Arc;

use roster_adapter::store::{DocumentStore, Update};
use roster_adapter::{DocumentPerformanceLedger, DocumentSalesPersonRepository, InMemoryDocumentStore};
use roster_domain::{
    AppendOutcome, PerformanceEvaluation, PerformanceLedger, RepositoryError, SalesPerson,
    SalesPersonId, SalesPersonRepository, TraitScores,
};
use serde_json::json;

type Ledger = DocumentPerformanceLedger<InMemoryDocumentStore>;

fn id(raw: u32) -> SalesPersonId {
    SalesPersonId::new(raw).unwrap()
}

fn evaluation(owner: u32, year: i32, leadership: i64) -> PerformanceEvaluation {
    PerformanceEvaluation::new(
        id(owner),
        year,
        TraitScores::new(leadership, 3, 4, 5, 4, 4).unwrap(),
    )
}

async fn setup_with_john() -> (Arc<InMemoryDocumentStore>, Ledger) {
    let store = Arc::new(InMemoryDocumentStore::new());
    let repo = DocumentSalesPersonRepository::new(Arc::clone(&store));
    repo.create(&SalesPerson::new(id(1001), "John", "Smith").unwrap())
        .await
        .unwrap();
    (store, DocumentPerformanceLedger::new(repo))
}

#[tokio::test]
async fn test_append_then_replace_same_year() {
    let (_, ledger) = setup_with_john().await;

    let first = ledger.append(id(1001), evaluation(1001, 2024, 4)).await.unwrap();
    assert_eq!(first, AppendOutcome::Appended);

    let all = ledger.list_all(id(1001)).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].year(), 2024);
    assert_eq!(all[0].scores().leadership(), 4);

    let second = ledger.append(id(1001), evaluation(1001, 2024, 5)).await.unwrap();
    assert_eq!(second, AppendOutcome::Replaced);

    let all = ledger.list_all(id(1001)).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].scores().leadership(), 5);
}

#[tokio::test]
async fn test_repeated_appends_keep_one_record_per_year() {
    let (_, ledger) = setup_with_john().await;

    for leadership in [1, 2, 3, 0, 5] {
        ledger
            .append(id(1001), evaluation(1001, 2022, leadership))
            .await
            .unwrap();
    }

    let stored = ledger.repository().get_by_id(id(1001)).await.unwrap();
    assert_eq!(stored.evaluations().len(), 1);
    assert_eq!(stored.evaluations()[0].scores().leadership(), 5);
}

#[tokio::test]
async fn test_replace_keeps_storage_position() {
    let (_, ledger) = setup_with_john().await;
    ledger.append(id(1001), evaluation(1001, 2021, 1)).await.unwrap();
    ledger.append(id(1001), evaluation(1001, 2022, 1)).await.unwrap();

    ledger.append(id(1001), evaluation(1001, 2021, 4)).await.unwrap();

    let stored = ledger.repository().get_by_id(id(1001)).await.unwrap();
    let years: Vec<_> = stored.evaluations().iter().map(|e| e.year()).collect();
    assert_eq!(years, vec![2021, 2022]);
    assert_eq!(stored.evaluations()[0].scores().leadership(), 4);
}

#[tokio::test]
async fn test_append_to_missing_person_is_not_found() {
    let (_, ledger) = setup_with_john().await;

    let err = ledger
        .append(id(2000), evaluation(2000, 2024, 4))
        .await
        .unwrap_err();

    assert_eq!(err, RepositoryError::NotFound { id: "2000".into() });
}

#[tokio::test]
async fn test_append_foreign_evaluation_rejected() {
    let (_, ledger) = setup_with_john().await;

    let err = ledger
        .append(id(1001), evaluation(7, 2024, 4))
        .await
        .unwrap_err();

    assert!(matches!(err, RepositoryError::InvariantViolation { .. }));
    assert!(ledger.list_all(id(1001)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_all_sorted_descending() {
    let (_, ledger) = setup_with_john().await;
    for year in [2019, 2024, 2020, 2023, 2021] {
        ledger.append(id(1001), evaluation(1001, year, 3)).await.unwrap();
    }

    let years: Vec<_> = ledger
        .list_all(id(1001))
        .await
        .unwrap()
        .iter()
        .map(|e| e.year())
        .collect();

    assert_eq!(years, vec![2024, 2023, 2021, 2020, 2019]);
}

#[tokio::test]
async fn test_list_all_empty_and_missing() {
    let (_, ledger) = setup_with_john().await;

    assert!(ledger.list_all(id(1001)).await.unwrap().is_empty());

    let err = ledger.list_all(id(9)).await.unwrap_err();
    assert_eq!(err, RepositoryError::NotFound { id: "9".into() });
}

#[tokio::test]
async fn test_list_by_year() {
    let (_, ledger) = setup_with_john().await;
    ledger.append(id(1001), evaluation(1001, 2023, 2)).await.unwrap();
    ledger.append(id(1001), evaluation(1001, 2024, 4)).await.unwrap();

    let found = ledger.list_by_year(id(1001), 2023).await.unwrap().unwrap();
    assert_eq!(found.scores().leadership(), 2);

    // A missing year is an empty result, not an error
    assert!(ledger.list_by_year(id(1001), 1999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_latest_matches_head_of_list() {
    let (_, ledger) = setup_with_john().await;

    let err = ledger.latest(id(1001)).await.unwrap_err();
    assert_eq!(err, RepositoryError::EvaluationNotFound { id: "1001".into() });

    for year in [2022, 2025, 2020] {
        ledger.append(id(1001), evaluation(1001, year, 1)).await.unwrap();
    }

    let latest = ledger.latest(id(1001)).await.unwrap();
    let all = ledger.list_all(id(1001)).await.unwrap();
    assert_eq!(latest, all[0]);
    assert_eq!(latest.year(), 2025);
}

#[tokio::test]
async fn test_remove_by_year_is_idempotent() {
    let (_, ledger) = setup_with_john().await;
    ledger.append(id(1001), evaluation(1001, 2024, 4)).await.unwrap();

    assert_eq!(ledger.remove_by_year(id(1001), 2024).await.unwrap(), 1);
    assert_eq!(ledger.remove_by_year(id(1001), 2024).await.unwrap(), 0);
    assert!(ledger.list_all(id(1001)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_latest_vs_remove_by_year_on_empty() {
    let (_, ledger) = setup_with_john().await;

    let err = ledger.remove_latest(id(1001)).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, RepositoryError::EvaluationNotFound { .. }));

    assert_eq!(ledger.remove_by_year(id(1001), 1999).await.unwrap(), 0);
}

#[tokio::test]
async fn test_remove_latest_removes_highest_year() {
    let (_, ledger) = setup_with_john().await;
    for year in [2021, 2024, 2022] {
        ledger.append(id(1001), evaluation(1001, year, 2)).await.unwrap();
    }

    let removed = ledger.remove_latest(id(1001)).await.unwrap();
    assert_eq!(removed.year(), 2024);

    let years: Vec<_> = ledger
        .list_all(id(1001))
        .await
        .unwrap()
        .iter()
        .map(|e| e.year())
        .collect();
    assert_eq!(years, vec![2022, 2021]);
}

#[tokio::test]
async fn test_delete_person_cascades() {
    let (_, ledger) = setup_with_john().await;
    ledger.append(id(1001), evaluation(1001, 2024, 4)).await.unwrap();

    ledger.repository().delete_by_id(id(1001)).await.unwrap();

    assert!(ledger
        .repository()
        .get_by_id(id(1001))
        .await
        .unwrap_err()
        .is_not_found());
    assert_eq!(
        ledger.list_all(id(1001)).await.unwrap_err(),
        RepositoryError::NotFound { id: "1001".into() }
    );
    assert!(ledger.remove_by_year(id(1001), 2024).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_duplicate_years_resolve_to_last_written() {
    let (store, ledger) = setup_with_john().await;
    let record = |leadership: i64| {
        json!({
            "salesmanId": 1001, "leadership": leadership, "openness": 3, "behaviour": 4,
            "attitude": 5, "communication": 4, "integrity": 4, "year": 2024
        })
    };

    // Write a defect state straight into the store
    store
        .update_one(
            ledger.repository().collection(),
            &roster_adapter::store::Filter::by("_id", 1001),
            &Update::new()
                .push("performanceRecords", record(1))
                .push("performanceRecords", record(2)),
        )
        .await
        .unwrap();

    let all = ledger.list_all(id(1001)).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].scores().leadership(), 2);

    let latest = ledger.latest(id(1001)).await.unwrap();
    assert_eq!(latest.scores().leadership(), 2);

    let by_year = ledger.list_by_year(id(1001), 2024).await.unwrap().unwrap();
    assert_eq!(by_year.scores().leadership(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_for_different_years() {
    let (_, ledger) = setup_with_john().await;
    let ledger = Arc::new(ledger);

    let handles: Vec<_> = (2000..2032)
        .map(|year| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move { ledger.append(id(1001), evaluation(1001, year, 3)).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), AppendOutcome::Appended);
    }

    let all = ledger.list_all(id(1001)).await.unwrap();
    assert_eq!(all.len(), 32);
    assert_eq!(all[0].year(), 2031);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_for_same_year() {
    let (_, ledger) = setup_with_john().await;
    let ledger = Arc::new(ledger);

    let handles: Vec<_> = (0..=5)
        .map(|leadership| {
            let ledger = Arc::clone(&ledger);
            tokio::spawn(async move {
                ledger
                    .append(id(1001), evaluation(1001, 2024, leadership))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let stored = ledger.repository().get_by_id(id(1001)).await.unwrap();
    assert_eq!(stored.evaluations().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_append_and_remove_latest() {
    let (_, ledger) = setup_with_john().await;
    ledger.append(id(1001), evaluation(1001, 2022, 1)).await.unwrap();
    ledger.append(id(1001), evaluation(1001, 2023, 1)).await.unwrap();
    let ledger = Arc::new(ledger);

    let appender = {
        let ledger = Arc::clone(&ledger);
        tokio::spawn(async move { ledger.append(id(1001), evaluation(1001, 2024, 1)).await })
    };
    let remover = {
        let ledger = Arc::clone(&ledger);
        tokio::spawn(async move { ledger.remove_latest(id(1001)).await })
    };

    appender.await.unwrap().unwrap();
    let removed = remover.await.unwrap().unwrap();

    // Either order is fine; nothing is lost or half-applied
    let years: Vec<_> = ledger
        .list_all(id(1001))
        .await
        .unwrap()
        .iter()
        .map(|e| e.year())
        .collect();
    match removed.year() {
        2023 => assert_eq!(years, vec![2024, 2022]),
        2024 => assert_eq!(years, vec![2023, 2022]),
        other => panic!("unexpected removal of {}", other),
    }
}

#[tokio::test]
async fn test_remove_latest_with_duplicate_years() {
    let (store, ledger) = setup_with_john().await;
    let record = |leadership: i64| {
        json!({
            "salesmanId": 1001, "leadership": leadership, "openness": 3, "behaviour": 4,
            "attitude": 5, "communication": 4, "integrity": 4, "year": 2024
        })
    };
    store
        .update_one(
            ledger.repository().collection(),
            &roster_adapter::store::Filter::by("_id", 1001),
            &Update::new()
                .push("performanceRecords", record(1))
                .push("performanceRecords", record(2))
                .push("performanceRecords", record(2)),
        )
        .await
        .unwrap();

    // Identical copies of the selected element go in one pull
    let removed = ledger.remove_latest(id(1001)).await.unwrap();
    assert_eq!(removed.scores().leadership(), 2);

    // The differing duplicate is left and becomes the latest
    let left = ledger.list_all(id(1001)).await.unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].scores().leadership(), 1);

    ledger.remove_latest(id(1001)).await.unwrap();
    assert!(ledger.list_all(id(1001)).await.unwrap().is_empty());
}
