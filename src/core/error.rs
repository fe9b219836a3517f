//! Typed error handling for the record API
//!
//! Every failure a handler can produce is an [`AdminError`]. Each variant
//! knows its HTTP status and stable error code, so handlers can use `?`
//! and let [`IntoResponse`] shape the reply.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: payload failed its schema or was not JSON
//! - [`StorageError`]: the store adapter failed (connectivity, query, decode)
//! - not-found, malformed identifiers, invalid pages and rejected sessions
//!   are carried directly on [`AdminError`]
//!
//! # Example
//!
//! ```rust,ignore
//! async fn read(id: Uuid) -> Result<User, AdminError> {
//!     store.find_by_id(&id).await?.ok_or(AdminError::NotFound {
//!         resource: "users",
//!         id,
//!     })
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

/// The main error type of the record API
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// Payload failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Target record does not exist
    #[error("{resource} record '{id}' not found")]
    NotFound { resource: &'static str, id: Uuid },

    /// Path identifier is not in the store's identity format
    #[error("Invalid identifier: {value}")]
    InvalidIdentifier { value: String },

    /// Requested page resolved below 1
    #[error("Invalid page number: {page}")]
    InvalidPage { page: i64 },

    /// Authorization gate rejected the request
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Store adapter failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AdminError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Validation(_) => StatusCode::BAD_REQUEST,
            AdminError::NotFound { .. } => StatusCode::NOT_FOUND,
            AdminError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
            AdminError::InvalidPage { .. } => StatusCode::BAD_REQUEST,
            AdminError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AdminError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AdminError::Validation(e) => e.error_code(),
            AdminError::NotFound { .. } => "NOT_FOUND",
            AdminError::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            AdminError::InvalidPage { .. } => "INVALID_PAGE",
            AdminError::Unauthorized { .. } => "UNAUTHORIZED",
            AdminError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether the response for this error carries no body at all
    ///
    /// Not-found and invalid-page outcomes are reported by status alone.
    pub fn has_empty_body(&self) -> bool {
        matches!(
            self,
            AdminError::NotFound { .. } | AdminError::InvalidPage { .. }
        )
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            AdminError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            AdminError::InvalidIdentifier { value } => {
                Some(serde_json::json!({ "value": value }))
            }
            AdminError::Storage(StorageError::Backend { backend, .. }) => {
                Some(serde_json::json!({ "backend": backend }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let AdminError::Storage(e) = &self {
            tracing::error!(error = %e, "store operation failed");
        }
        if self.has_empty_body() {
            return status.into_response();
        }
        (status, Json(self.to_response())).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// One or more fields failed their schema rule
    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// Request body was not valid JSON
    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl FieldValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Shorthand for a single failing field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldErrors(vec![FieldValidationError::new(field, message)])
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::InvalidJson {
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors raised by store adapters
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backend rejected or failed an operation
    #[error("{backend} {operation} failed: {message}")]
    Backend {
        backend: &'static str,
        operation: &'static str,
        message: String,
    },

    /// A stored document could not be converted to or from a record
    #[error("Record serialization error: {message}")]
    Serialization { message: String },

    /// In-memory store lock was poisoned
    #[error("Store lock poisoned: {message}")]
    Lock { message: String },
}

impl StorageError {
    pub fn backend(
        backend: &'static str,
        operation: &'static str,
        err: impl std::fmt::Display,
    ) -> Self {
        StorageError::Backend {
            backend,
            operation,
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization {
            message: err.to_string(),
        }
    }
}

/// A specialized Result type for handler operations
pub type AdminResult<T> = Result<T, AdminError>;

/// A specialized Result type for store operations
pub type StoreResult<T> = Result<T, StorageError>;
