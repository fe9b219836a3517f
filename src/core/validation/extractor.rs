//! Axum extractors for record payloads
//!
//! [`JsonPayload`] reads a lenient JSON body (an empty body is an empty
//! object). [`Validated`] runs it through the record's schema for the
//! operation implied by the HTTP method before the handler sees it.

use std::marker::PhantomData;

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use super::config::RecordSchema;
use crate::core::error::{AdminError, ValidationError};

/// Operation a payload is validated for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update,
}

impl Operation {
    /// Determine operation from HTTP method
    pub fn from_method(method: &Method) -> Self {
        if method == Method::PATCH || method == Method::PUT {
            Operation::Update
        } else {
            Operation::Create
        }
    }
}

/// Trait for record kinds that carry validation schemas
pub trait ValidatableRecord {
    /// Get the schema for a specific operation
    fn schema(operation: Operation) -> RecordSchema;
}

/// Raw JSON body; empty bodies read as `{}`
#[derive(Debug, Clone)]
pub struct JsonPayload(pub Value);

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            AdminError::from(ValidationError::InvalidJson {
                message: e.body_text(),
            })
            .into_response()
        })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonPayload(Value::Object(Map::new())));
        }

        serde_json::from_slice(&bytes)
            .map(JsonPayload)
            .map_err(|e| AdminError::from(ValidationError::from(e)).into_response())
    }
}

/// Axum extractor that validates and normalizes a record payload
///
/// # Usage
///
/// ```rust,ignore
/// pub async fn create_user(validated: Validated<User>) -> AdminResult<Json<User>> {
///     // only schema fields, dates already normalized
///     let payload = validated.into_inner();
/// }
/// ```
pub struct Validated<T>(pub Map<String, Value>, PhantomData<T>);

impl<T> Validated<T> {
    /// Create a new validated payload
    pub fn new(payload: Map<String, Value>) -> Self {
        Self(payload, PhantomData)
    }

    /// Get the inner payload
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl<T> std::ops::Deref for Validated<T> {
    type Target = Map<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: ValidatableRecord + Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let operation = Operation::from_method(req.method());
        let JsonPayload(payload) = JsonPayload::from_request(req, state).await?;

        T::schema(operation)
            .validate_and_filter(payload)
            .map(Validated::new)
            .map_err(|errors| {
                tracing::debug!(?operation, failed = errors.len(), "payload rejected");
                AdminError::from(ValidationError::FieldErrors(errors)).into_response()
            })
    }
}
