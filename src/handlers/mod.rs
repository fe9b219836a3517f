//! HTTP handlers for the record resources
//!
//! Handlers compose the pieces from [`crate::core`]: the session gate runs
//! as middleware before them, [`Validated`](crate::core::validation::Validated)
//! checks payloads, and the store adapter executes a single operation per
//! request. Every failure is an [`AdminError`](crate::core::AdminError).

pub mod content;
pub mod users;

use std::sync::Arc;

use axum::Json;
use axum::extract::FromRef;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::core::extractors::ForwardedHeaders;
use crate::core::query::{LAST_PAGE_HEADER, PAGE_SIZE, last_page};
use crate::core::service::RecordStore;
use crate::entities::{Content, User};

/// State shared by the user handlers
#[derive(Clone)]
pub struct UsersState {
    pub store: Arc<dyn RecordStore<User>>,
    pub forwarded_headers: ForwardedHeaders,
}

impl FromRef<UsersState> for ForwardedHeaders {
    fn from_ref(state: &UsersState) -> Self {
        state.forwarded_headers
    }
}

/// State shared by the content handlers
#[derive(Clone)]
pub struct ContentState {
    pub store: Arc<dyn RecordStore<Content>>,
}

/// One page of records, with the page count in the `Last-Page` header
pub(crate) fn page_response<R: Serialize>(records: Vec<R>, total: u64) -> Response {
    let mut response = Json(records).into_response();
    response.headers_mut().insert(
        LAST_PAGE_HEADER,
        HeaderValue::from(last_page(total, PAGE_SIZE)),
    );
    response
}
