//! In-memory implementation of RecordStore for testing and development

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::entity::{Record, new_record_id};
use crate::core::error::{StorageError, StoreResult};
use crate::core::service::RecordStore;
use crate::core::store::{Filter, Sort};

const BACKEND: &str = "in-memory";

/// In-memory record store
///
/// Records are kept in insertion order; each operation takes the lock
/// once, so single-record mutations are atomic.
#[derive(Clone)]
pub struct InMemoryStore<R> {
    records: Arc<RwLock<IndexMap<Uuid, R>>>,
}

impl<R> InMemoryStore<R> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
        }
    }
}

impl<R> Default for InMemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned(e: impl std::fmt::Display) -> StorageError {
    StorageError::Lock {
        message: e.to_string(),
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for InMemoryStore<R> {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let record = R::from_draft(new_record_id(), draft);
        let mut records = self.records.write().map_err(poisoned)?;
        records.insert(record.id(), record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<R>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.get(id).cloned())
    }

    async fn find(
        &self,
        filter: &Filter,
        sort: Sort,
        skip: usize,
        limit: usize,
    ) -> StoreResult<Vec<R>> {
        let records = self.records.read().map_err(poisoned)?;
        let matching = records.values().filter(|r| filter.matches(*r));

        let page = match sort {
            Sort::NewestFirst => matching.rev().skip(skip).take(limit).cloned().collect(),
            Sort::OldestFirst => matching.skip(skip).take(limit).cloned().collect(),
        };
        Ok(page)
    }

    async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.values().filter(|r| filter.matches(*r)).count() as u64)
    }

    async fn update_by_id(&self, id: &Uuid, patch: &Map<String, Value>) -> StoreResult<Option<R>> {
        let mut records = self.records.write().map_err(poisoned)?;
        let Some(current) = records.get_mut(id) else {
            return Ok(None);
        };

        let updated = current.apply_patch(patch)?;
        *current = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: &Uuid) -> StoreResult<bool> {
        let mut records = self.records.write().map_err(poisoned)?;
        // shift_remove keeps the remaining insertion order intact
        Ok(records.shift_remove(id).is_some())
    }
}
