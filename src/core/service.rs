//! Store adapter trait for record collections

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::entity::Record;
use crate::core::error::StoreResult;
use crate::core::store::{Filter, Sort};

/// Store adapter over one record collection
///
/// Implementations own identity assignment and must make each single-record
/// mutation atomic; handlers never read-then-write.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Name of the backend, used in logs and storage errors
    fn backend_name(&self) -> &'static str;

    /// Insert a draft, assigning identity and insertion order
    async fn create(&self, draft: R::Draft) -> StoreResult<R>;

    /// Get a record by identity
    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<R>>;

    /// List records matching `filter`, ordered by `sort`, windowed by `skip`/`limit`
    async fn find(&self, filter: &Filter, sort: Sort, skip: usize, limit: usize)
    -> StoreResult<Vec<R>>;

    /// Count records matching `filter`
    async fn count(&self, filter: &Filter) -> StoreResult<u64>;

    /// Apply a partial update and return the post-update record
    ///
    /// Returns `Ok(None)` when no record has this identity.
    async fn update_by_id(&self, id: &Uuid, patch: &Map<String, Value>) -> StoreResult<Option<R>>;

    /// Delete a record
    ///
    /// Returns whether a record was actually removed; deleting a missing
    /// identity is not an error.
    async fn delete_by_id(&self, id: &Uuid) -> StoreResult<bool>;
}
