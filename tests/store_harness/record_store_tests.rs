//! Macro-generated test suite for `RecordStore` contract validation.
//!
//! The `record_store_tests!` macro generates a test module that validates any
//! `RecordStore` implementation against the contract the generated resolvers
//! rely on.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! use sheetql::storage::InMemoryRecordStore;
//!
//! record_store_tests!(InMemoryRecordStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_find`: create then retrieve by type and id
//! - `test_find_nonexistent`: unknown id and unknown type both give None
//! - `test_find_all_empty`: find_all on an empty type
//! - `test_find_all_insertion_order`: records come back in creation order
//! - `test_find_records_requested_order`: order and duplicates kept, unknown ids skipped
//! - `test_update_existing`: props merged into the stored record
//! - `test_update_nonexistent`: update of an unknown id gives None
//! - `test_delete_existing`: delete then find gives None
//! - `test_delete_nonexistent`: deleting an unknown id is Ok
//!
//! ## Edge Cases
//! - `test_types_are_isolated`: same id under two types
//! - `test_new_id_unique`: ids never repeat
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate a `RecordStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh store. It is re-evaluated for each test
/// to ensure isolation. For the concurrent access test, the store must also
/// implement `Clone + 'static` (shared state via Arc pattern).
#[macro_export]
macro_rules! record_store_tests {
    ($factory:expr) => {
        mod record_store_contract_tests {
            use super::*;
            use serde_json::json;
            use sheetql::core::store::RecordStore;

            // ==================================================================
            // CRUD: Create & Find
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_find() {
                let store = $factory;
                let created = store
                    .create_record("Person", record(json!({"id": "taras", "name": "Taras"})))
                    .await
                    .unwrap();
                assert_eq!(created["name"], json!("Taras"));

                let found = store.find_record("Person", "taras").await.unwrap();
                assert_eq!(found, Some(record(json!({"id": "taras", "name": "Taras"}))));
            }

            #[tokio::test]
            async fn test_find_nonexistent() {
                let store = $factory;
                store
                    .create_record("Person", record(json!({"id": "taras"})))
                    .await
                    .unwrap();

                assert!(store.find_record("Person", "ghost").await.unwrap().is_none());
                assert!(store.find_record("Product", "taras").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_find_all_empty() {
                let store = $factory;
                assert!(store.find_all("Person").await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_find_all_insertion_order() {
                let store = $factory;
                for id in ["macbook", "iphone", "ipad"] {
                    store
                        .create_record("Product", record(json!({"id": id})))
                        .await
                        .unwrap();
                }

                let all = store.find_all("Product").await.unwrap();
                assert_eq!(ids_of(&all), vec!["macbook", "iphone", "ipad"]);
            }

            #[tokio::test]
            async fn test_find_records_requested_order() {
                let store = $factory;
                for id in ["iphone", "ipad", "macbook"] {
                    store
                        .create_record("Product", record(json!({"id": id})))
                        .await
                        .unwrap();
                }

                let wanted: Vec<String> = ["macbook", "pixel", "iphone", "macbook"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
                let found = store.find_records("Product", &wanted).await.unwrap();
                assert_eq!(ids_of(&found), vec!["macbook", "iphone", "macbook"]);

                assert!(store.find_records("Product", &[]).await.unwrap().is_empty());
            }

            // ==================================================================
            // CRUD: Update & Delete
            // ==================================================================

            #[tokio::test]
            async fn test_update_existing() {
                let store = $factory;
                store
                    .create_record(
                        "Person",
                        record(json!({"id": "taras", "firstName": "T", "lastName": "Mankovski"})),
                    )
                    .await
                    .unwrap();

                let updated = store
                    .update_record("Person", record(json!({"id": "taras", "firstName": "Taras"})))
                    .await
                    .unwrap()
                    .expect("record should exist");
                assert_eq!(updated["firstName"], json!("Taras"));
                assert_eq!(updated["lastName"], json!("Mankovski"));

                let found = store.find_record("Person", "taras").await.unwrap().unwrap();
                assert_eq!(found, updated);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let updated = store
                    .update_record("Person", record(json!({"id": "ghost"})))
                    .await
                    .unwrap();
                assert!(updated.is_none());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                store
                    .create_record("Person", record(json!({"id": "taras"})))
                    .await
                    .unwrap();

                store.delete_record("Person", "taras").await.unwrap();
                assert!(store.find_record("Person", "taras").await.unwrap().is_none());
                assert!(store.find_all("Person").await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                store.delete_record("Person", "ghost").await.unwrap();
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_types_are_isolated() {
                let store = $factory;
                store
                    .create_record("Person", record(json!({"id": "x", "kind": "person"})))
                    .await
                    .unwrap();
                store
                    .create_record("Product", record(json!({"id": "x", "kind": "product"})))
                    .await
                    .unwrap();

                let person = store.find_record("Person", "x").await.unwrap().unwrap();
                let product = store.find_record("Product", "x").await.unwrap().unwrap();
                assert_eq!(person["kind"], json!("person"));
                assert_eq!(product["kind"], json!("product"));
            }

            #[test]
            fn test_new_id_unique() {
                let store = $factory;
                let ids: std::collections::HashSet<String> =
                    (0..100).map(|_| store.new_id()).collect();
                assert_eq!(ids.len(), 100);
            }

            #[tokio::test]
            async fn test_concurrent_access() {
                let store = $factory;
                let s1 = store.clone();
                let s2 = store.clone();

                let h1 = tokio::spawn(async move {
                    s1.create_record("Person", record(json!({"id": "a"}))).await
                });
                let h2 = tokio::spawn(async move {
                    s2.create_record("Person", record(json!({"id": "b"}))).await
                });

                let (r1, r2) = tokio::time::timeout(std::time::Duration::from_secs(30), async {
                    tokio::try_join!(h1, h2).unwrap()
                })
                .await
                .expect("Concurrent creates timed out after 30s, possible deadlock");

                r1.unwrap();
                r2.unwrap();

                let mut ids = ids_of(&store.find_all("Person").await.unwrap());
                ids.sort();
                assert_eq!(ids, vec!["a", "b"]);
            }
        }
    };
}
