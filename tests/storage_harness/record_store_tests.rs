//! Macro-generated test suite for `RecordStore<User>` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use admin_records::storage::InMemoryStore;
//!
//! record_store_tests!(InMemoryStore::<User>::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_create_and_find_by_id`: create assigns identity, record reads back equal
//! - `test_find_by_id_missing`: unknown identity is absent, not an error
//! - `test_update_changes_only_patched_fields`
//! - `test_update_missing_is_absent`
//! - `test_update_with_empty_patch_returns_current`
//! - `test_delete_reports_whether_removed`
//!
//! ## Listing
//! - `test_find_newest_first_with_window`: skip/limit over newest-first order
//! - `test_find_oldest_first`
//! - `test_count_uses_same_filter_as_find`
//! - `test_contains_filter_on_unknown_field_matches_nothing`
//! - `test_operator_and_path_fields_match_nothing`
//! - `test_find_past_the_end_is_empty`: skip beyond any signed 64-bit offset
//!
//! ## Concurrency
//! - `test_concurrent_creates`: parallel creates from spawned tasks

/// Generate a full `RecordStore<User>` conformance test suite.
///
/// `$factory` is re-evaluated for each test so every test starts from an
/// empty store. For the concurrency test the store must be `Clone`.
#[macro_export]
macro_rules! record_store_tests {
    ($factory:expr) => {
        mod record_store_contract_tests {
            use super::*;
            use admin_records::core::service::RecordStore;
            use admin_records::core::store::{Filter, Sort};
            use admin_records::entities::User;
            use regex::Regex;
            use serde_json::json;
            use uuid::Uuid;

            fn contains(field: &str, value: &str) -> Filter {
                Filter::Contains {
                    field: field.to_string(),
                    pattern: Regex::new(&format!(".*{}.*", value)).unwrap(),
                }
            }

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_find_by_id() {
                let store = $factory;
                let created: User = store.create(user_draft("Kim")).await.unwrap();

                assert_eq!(created.name, "Kim");
                assert_eq!(created.ip, "192.0.2.5");
                assert_eq!(created.published_date, published());

                let found = store.find_by_id(&created.id).await.unwrap();
                assert_eq!(found, Some(created));
            }

            #[tokio::test]
            async fn test_find_by_id_missing() {
                let store = $factory;
                let found: Option<User> = store.find_by_id(&Uuid::now_v7()).await.unwrap();
                assert!(found.is_none());
            }

            #[tokio::test]
            async fn test_update_changes_only_patched_fields() {
                let store = $factory;
                let created: User = store.create(user_draft("A")).await.unwrap();

                let patch = json!({ "name": "A2" });
                let updated = store
                    .update_by_id(&created.id, patch.as_object().unwrap())
                    .await
                    .unwrap()
                    .expect("record exists");

                assert_eq!(updated.name, "A2");
                assert_eq!(updated.hp, created.hp);
                assert_eq!(updated.branch, created.branch);
                assert_eq!(updated.id, created.id);

                let stored = store.find_by_id(&created.id).await.unwrap().unwrap();
                assert_eq!(stored, updated);
            }

            #[tokio::test]
            async fn test_update_missing_is_absent() {
                let store = $factory;
                let patch = json!({ "name": "ghost" });
                let updated: Option<User> = store
                    .update_by_id(&Uuid::now_v7(), patch.as_object().unwrap())
                    .await
                    .unwrap();
                assert!(updated.is_none());
            }

            #[tokio::test]
            async fn test_update_with_empty_patch_returns_current() {
                let store = $factory;
                let created: User = store.create(user_draft("Same")).await.unwrap();
                let patch = serde_json::Map::new();
                let updated = store.update_by_id(&created.id, &patch).await.unwrap();
                assert_eq!(updated, Some(created));
            }

            #[tokio::test]
            async fn test_delete_reports_whether_removed() {
                let store = $factory;
                let created: User = store.create(user_draft("Gone")).await.unwrap();

                assert!(store.delete_by_id(&created.id).await.unwrap());
                assert!(!store.delete_by_id(&created.id).await.unwrap());
                assert!(store.find_by_id(&created.id).await.unwrap().is_none());
            }

            // ==================================================================
            // Listing
            // ==================================================================

            #[tokio::test]
            async fn test_find_newest_first_with_window() {
                let store = $factory;
                for i in 0..12 {
                    let _: User = store.create(user_draft(&format!("user-{i:02}"))).await.unwrap();
                }

                let first: Vec<User> = store.find(&Filter::All, Sort::NewestFirst, 0, 10).await.unwrap();
                assert_eq!(first.len(), 10);
                assert_eq!(first[0].name, "user-11");
                assert_eq!(first[9].name, "user-02");

                let second: Vec<User> = store.find(&Filter::All, Sort::NewestFirst, 10, 10).await.unwrap();
                let names: Vec<_> = second.iter().map(|u| u.name.as_str()).collect();
                assert_eq!(names, vec!["user-01", "user-00"]);
            }

            #[tokio::test]
            async fn test_find_oldest_first() {
                let store = $factory;
                let first: User = store.create(user_draft("first")).await.unwrap();
                let _: User = store.create(user_draft("second")).await.unwrap();

                let oldest: Vec<User> = store.find(&Filter::All, Sort::OldestFirst, 0, 1).await.unwrap();
                assert_eq!(oldest, vec![first]);
            }

            #[tokio::test]
            async fn test_count_uses_same_filter_as_find() {
                let store = $factory;
                for name in ["Kim Minji", "Lee", "Kimberly", "Park", "kim lowercase"] {
                    let _: User = store.create(user_draft(name)).await.unwrap();
                }

                let filter = contains("name", "Kim");
                let total = store.count(&filter).await.unwrap();
                let found: Vec<User> = store.find(&filter, Sort::NewestFirst, 0, 10).await.unwrap();

                assert_eq!(total, 2);
                assert_eq!(found.len(), 2);
                assert_eq!(found[0].name, "Kimberly");
                assert_eq!(found[1].name, "Kim Minji");
                assert_eq!(store.count(&Filter::All).await.unwrap(), 5);
            }

            #[tokio::test]
            async fn test_contains_filter_on_unknown_field_matches_nothing() {
                let store = $factory;
                let _: User = store.create(user_draft("Kim")).await.unwrap();

                let filter = contains("nickname", "Kim");
                assert_eq!(store.count(&filter).await.unwrap(), 0);
                let found: Vec<User> = store.find(&filter, Sort::NewestFirst, 0, 10).await.unwrap();
                assert!(found.is_empty());
            }

            #[tokio::test]
            async fn test_operator_and_path_fields_match_nothing() {
                let store = $factory;
                let _: User = store.create(user_draft("Kim")).await.unwrap();

                for field in ["$where", "$or", "name.first"] {
                    let filter = contains(field, "Kim");
                    assert_eq!(store.count(&filter).await.unwrap(), 0);
                    let found: Vec<User> = store.find(&filter, Sort::NewestFirst, 0, 10).await.unwrap();
                    assert!(found.is_empty());
                }
                assert_eq!(store.count(&Filter::Nothing).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_find_past_the_end_is_empty() {
                let store = $factory;
                let _: User = store.create(user_draft("Kim")).await.unwrap();

                for skip in [usize::MAX, i64::MAX as usize + 1] {
                    let found: Vec<User> = store.find(&Filter::All, Sort::NewestFirst, skip, 10).await.unwrap();
                    assert!(found.is_empty());
                }
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_creates() {
                let store = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        let created: User = store.create(user_draft(&format!("c{i}"))).await.unwrap();
                        created.id
                    }));
                }

                let mut ids = Vec::new();
                for handle in handles {
                    ids.push(handle.await.unwrap());
                }
                ids.sort();
                ids.dedup();

                assert_eq!(ids.len(), 10);
                assert_eq!(store.count(&Filter::All).await.unwrap(), 10);
            }
        }
    };
}
