//! Server module for building the HTTP server
//!
//! This module provides a `ServerBuilder` that registers:
//! - User and content routes under `/api`, gated per route group
//! - Health check routes
//! - Request tracing and optional CORS

pub mod builder;
pub mod router;

pub use builder::ServerBuilder;
