//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides `MongoStore<R>`, a `RecordStore` backed by one collection per
//! record kind, named by `R::collection()` ("users", "content").
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! admin-records = { version = "0.1.0", features = ["mongodb_backend"] }
//! ```
//!
//! # Serialization strategy
//!
//! Records are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. UUIDs are therefore stored as strings
//! and dates as RFC 3339 strings. Identities are UUIDv7, so sorting on
//! `_id` is sorting by insertion.

use std::marker::PhantomData;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Database;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::ReturnDocument;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::core::entity::{ID_FIELD, Record, new_record_id};
use crate::core::error::{StorageError, StoreResult};
use crate::core::service::RecordStore;
use crate::core::store::{Filter, Sort, is_field_name};

const BACKEND: &str = "mongodb";

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON Document
fn json_to_document(json: Value) -> StoreResult<Document> {
    let bson = mongodb::bson::to_bson(&json).map_err(|e| StorageError::Serialization {
        message: format!("failed to convert JSON to BSON: {}", e),
    })?;

    match bson {
        Bson::Document(d) => Ok(d),
        other => Err(StorageError::Serialization {
            message: format!("expected BSON document, got {:?}", other.element_type()),
        }),
    }
}

/// Convert a BSON Document back into a serde_json::Value
fn document_to_json(doc: Document) -> Value {
    Bson::Document(doc).into_relaxed_extjson()
}

fn id_filter(id: &Uuid) -> Document {
    doc! { ID_FIELD: id.to_string() }
}

/// Query matching no document, since every stored record carries an id
fn match_nothing() -> Document {
    doc! { ID_FIELD: { "$exists": false } }
}

/// Translate a store filter into a MongoDB query document
///
/// Field names that would be read as operators or paths never reach the
/// query.
fn filter_document(filter: &Filter) -> Document {
    match filter {
        Filter::All => doc! {},
        Filter::Nothing => match_nothing(),
        Filter::Contains { field, .. } if !is_field_name(field) => match_nothing(),
        Filter::Contains { field, pattern } => {
            doc! { field.as_str(): { "$regex": pattern.as_str() } }
        }
    }
}

fn sort_document(sort: Sort) -> Document {
    match sort {
        Sort::NewestFirst => doc! { ID_FIELD: -1 },
        Sort::OldestFirst => doc! { ID_FIELD: 1 },
    }
}

// ---------------------------------------------------------------------------
// MongoStore<R>
// ---------------------------------------------------------------------------

/// Record store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use admin_records::storage::MongoStore;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let users = MongoStore::<User>::new(client.database("admin"));
/// ```
pub struct MongoStore<R> {
    database: Database,
    _marker: PhantomData<fn() -> R>,
}

impl<R> Clone for MongoStore<R> {
    fn clone(&self) -> Self {
        Self::new(self.database.clone())
    }
}

impl<R> MongoStore<R> {
    /// Create a new `MongoStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self {
            database,
            _marker: PhantomData,
        }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }
}

impl<R: Record> MongoStore<R> {
    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(R::collection())
    }

    fn record_to_document(record: &R) -> StoreResult<Document> {
        json_to_document(serde_json::to_value(record)?)
    }

    fn document_to_record(doc: Document) -> StoreResult<R> {
        Ok(serde_json::from_value(document_to_json(doc))?)
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MongoStore<R> {
    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    async fn create(&self, draft: R::Draft) -> StoreResult<R> {
        let record = R::from_draft(new_record_id(), draft);
        let doc = Self::record_to_document(&record)?;

        self.collection()
            .insert_one(doc)
            .await
            .map_err(|e| StorageError::backend(BACKEND, "insert", e))?;

        Ok(record)
    }

    async fn find_by_id(&self, id: &Uuid) -> StoreResult<Option<R>> {
        let doc = self
            .collection()
            .find_one(id_filter(id))
            .await
            .map_err(|e| StorageError::backend(BACKEND, "find_one", e))?;

        doc.map(Self::document_to_record).transpose()
    }

    async fn find(
        &self,
        filter: &Filter,
        sort: Sort,
        skip: usize,
        limit: usize,
    ) -> StoreResult<Vec<R>> {
        // the server takes skip as a signed 64-bit integer
        let Ok(skip) = i64::try_from(skip) else {
            return Ok(Vec::new());
        };
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let cursor = self
            .collection()
            .find(filter_document(filter))
            .sort(sort_document(sort))
            .skip(skip as u64)
            .limit(limit)
            .await
            .map_err(|e| StorageError::backend(BACKEND, "find", e))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StorageError::backend(BACKEND, "find", e))?;

        docs.into_iter().map(Self::document_to_record).collect()
    }

    async fn count(&self, filter: &Filter) -> StoreResult<u64> {
        self.collection()
            .count_documents(filter_document(filter))
            .await
            .map_err(|e| StorageError::backend(BACKEND, "count", e))
    }

    async fn update_by_id(&self, id: &Uuid, patch: &Map<String, Value>) -> StoreResult<Option<R>> {
        let mut fields = patch.clone();
        fields.remove(ID_FIELD);

        // MongoDB rejects an empty $set
        if fields.is_empty() {
            return self.find_by_id(id).await;
        }

        let set = json_to_document(Value::Object(fields))?;
        let updated = self
            .collection()
            .find_one_and_update(id_filter(id), doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| StorageError::backend(BACKEND, "update", e))?;

        updated.map(Self::document_to_record).transpose()
    }

    async fn delete_by_id(&self, id: &Uuid) -> StoreResult<bool> {
        let result = self
            .collection()
            .delete_one(id_filter(id))
            .await
            .map_err(|e| StorageError::backend(BACKEND, "delete", e))?;

        Ok(result.deleted_count > 0)
    }
}
