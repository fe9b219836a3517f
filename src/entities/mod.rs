//! Record kinds served by the API
//!
//! - [`User`]: contact/lead records, fully gated CRUD with paging and search
//! - [`Content`]: the promotional banner, read as a singleton

pub mod content;
pub mod user;

pub use content::{Content, ContentDraft};
pub use user::{User, UserDraft};
