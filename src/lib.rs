//! # Admin Records
//!
//! A session-gated administrative REST API over two record kinds: users
//! (contact leads left through a public form) and content (a promotional
//! banner read as a singleton).
//!
//! ## Features
//!
//! - **Declarative validation**: per-operation schemas with all failures reported at once
//! - **Pagination**: fixed 10-record pages, newest first, page count in the `Last-Page` header
//! - **Substring search**: one-field `.*value.*` pattern search over users
//! - **Partial updates**: only supplied fields change
//! - **Pluggable storage**: in-memory by default, MongoDB behind `mongodb_backend`
//! - **Session gate**: axum middleware in front of every administrative route
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use admin_records::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_user_store(InMemoryStore::<User>::new())
//!     .with_content_store(InMemoryStore::<Content>::new())
//!     .with_auth_provider(TokenAuthProvider::new(["change-me"]))
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app.into_make_service_with_connect_info::<std::net::SocketAddr>()).await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod handlers;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        auth::{AuthContext, AuthPolicy, AuthProvider, NoAuthProvider, TokenAuthProvider},
        entity::Record,
        error::{AdminError, AdminResult, StorageError, ValidationError},
        query::{PAGE_SIZE, PageQuery},
        service::RecordStore,
        store::{Filter, Sort},
    };

    // === Records ===
    pub use crate::entities::{Content, ContentDraft, User, UserDraft};

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoStore;

    // === Config ===
    pub use crate::config::AppConfig;

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
