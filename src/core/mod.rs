//! Core module containing the contracts shared by every resource

pub mod auth;
pub mod entity;
pub mod error;
pub mod extractors;
pub mod query;
pub mod search;
pub mod service;
pub mod store;
pub mod validation;

pub use auth::{AuthContext, AuthGate, AuthPolicy, AuthProvider, NoAuthProvider, TokenAuthProvider};
pub use entity::{ID_FIELD, Record};
pub use error::{AdminError, AdminResult, StorageError, StoreResult, ValidationError};
pub use extractors::{ClientAddr, ForwardedHeaders, RecordId};
pub use query::{LAST_PAGE_HEADER, PAGE_SIZE, PageQuery, PageWindow};
pub use search::build_search_filter;
pub use service::RecordStore;
pub use store::{Filter, Sort};
