//! Shared test harness for storage backend testing
//!
//! Provides draft builders for both record kinds and the
//! `record_store_tests!` macro, which runs the `RecordStore<User>` contract
//! against any backend.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//! use storage_harness::*;
//! ```

#![allow(dead_code)]

pub mod record_store_tests;

use admin_records::entities::{ContentDraft, UserDraft};
use chrono::{DateTime, TimeZone, Utc};

/// Fixed publication date used by every draft
pub fn published() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// A user draft with the given name and defaults for everything else
pub fn user_draft(name: &str) -> UserDraft {
    UserDraft {
        name: name.to_string(),
        hp: "010-1234-5678".to_string(),
        branch: "Seoul".to_string(),
        ip: "192.0.2.5".to_string(),
        published_date: published(),
    }
}

/// A banner draft
pub fn content_draft(text: &str) -> ContentDraft {
    ContentDraft {
        image_url_pc: Some("https://cdn.example.com/pc.png".to_string()),
        image_url_mo: Some("https://cdn.example.com/mo.png".to_string()),
        text: Some(text.to_string()),
        published_date: published(),
    }
}
