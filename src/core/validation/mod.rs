//! Validation and filtering system
//!
//! Record payloads are checked against a declarative schema per operation
//! and normalized (dates rewritten to RFC 3339) before they reach handlers.

pub mod config;
pub mod extractor;
pub mod filters;
pub mod validators;

pub use config::{FieldKind, FieldRule, Presence, RecordSchema};
pub use extractor::{JsonPayload, Operation, ValidatableRecord, Validated};
