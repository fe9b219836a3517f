//! Record trait defining the contract every stored resource kind fulfils

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::error::{StorageError, StoreResult};

/// Base trait for stored records.
///
/// A record kind has:
/// - a collection name (the store's namespace, e.g. "users")
/// - a draft type: the validated payload before the store assigns identity
/// - an immutable identity, assigned once by the store adapter
///
/// Records cross the store boundary as JSON objects, which keeps partial
/// updates generic over every record kind.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Draft payload accepted by `create`
    type Draft: Clone + Serialize + Send + Sync + 'static;

    /// Name of the backing collection (e.g., "users", "content")
    fn collection() -> &'static str;

    /// Build a stored record from a draft and its assigned identity
    fn from_draft(id: Uuid, draft: Self::Draft) -> Self;

    /// The record's identity
    fn id(&self) -> Uuid;

    /// Get a field as text for substring matching
    ///
    /// Returns `None` for fields the record does not have.
    fn field_text(&self, field: &str) -> Option<String>;

    /// Apply a partial update, leaving unlisted fields untouched
    ///
    /// The identity field is never overwritten, even if present in `patch`.
    fn apply_patch(&self, patch: &Map<String, Value>) -> StoreResult<Self> {
        let mut current = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(StorageError::Serialization {
                    message: format!("record serialized to non-object: {}", other),
                });
            }
        };

        for (key, value) in patch {
            if key == ID_FIELD {
                continue;
            }
            current.insert(key.clone(), value.clone());
        }

        Ok(serde_json::from_value(Value::Object(current))?)
    }
}

/// Wire name of the identity field for every record kind
pub const ID_FIELD: &str = "_id";

/// Allocate a fresh, time-ordered identity
///
/// UUIDv7 values sort in creation order, so ordering by identity is
/// ordering by insertion.
pub fn new_record_id() -> Uuid {
    Uuid::now_v7()
}
