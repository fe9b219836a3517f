//! Handlers for `/users`
//!
//! - POST   /users           create (public sign-up form)
//! - GET    /users?page=     list, newest first
//! - GET    /users/count     total number of users
//! - POST   /users/find?page= substring search on one field
//! - GET    /users/{id}      read
//! - PATCH  /users/{id}      partial update
//! - DELETE /users/{id}      delete
//!
//! Everything except create sits behind the session gate.

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;

use super::{UsersState, page_response};
use crate::core::error::{AdminError, AdminResult};
use crate::core::extractors::{ClientAddr, RecordId};
use crate::core::query::{PageQuery, PageWindow};
use crate::core::search::build_search_filter;
use crate::core::store::{Filter, Sort};
use crate::core::validation::{JsonPayload, Validated};
use crate::entities::{User, UserDraft};

const RESOURCE: &str = "users";

/// Create a user
///
/// POST /users
///
/// The origin address is taken from the connection, never from the body.
pub async fn create_user(
    State(state): State<UsersState>,
    ClientAddr(ip): ClientAddr,
    validated: Validated<User>,
) -> AdminResult<Json<User>> {
    let draft = UserDraft::from_payload(validated.into_inner(), ip)?;
    let user = state.store.create(draft).await?;

    tracing::info!(id = %user.id, ip = %user.ip, "user created");
    Ok(Json(user))
}

/// List users, newest first
///
/// GET /users?page=2
pub async fn list_users(
    State(state): State<UsersState>,
    Query(query): Query<PageQuery>,
) -> AdminResult<Response> {
    let window = checked_window(&query)?;
    fetch_page(&state, &Filter::All, window).await
}

/// Read one user
///
/// GET /users/{id}
pub async fn read_user(
    State(state): State<UsersState>,
    RecordId(id): RecordId,
) -> AdminResult<Json<User>> {
    tracing::debug!(%id, "reading user");

    state
        .store
        .find_by_id(&id)
        .await?
        .map(Json)
        .ok_or(AdminError::NotFound {
            resource: RESOURCE,
            id,
        })
}

/// Count all users
///
/// GET /users/count
pub async fn count_users(State(state): State<UsersState>) -> AdminResult<Json<u64>> {
    let total = state.store.count(&Filter::All).await?;
    Ok(Json(total))
}

/// Search users by substring on one field
///
/// POST /users/find?page=1 with a body such as `{"name": "Kim"}`
pub async fn search_users(
    State(state): State<UsersState>,
    Query(query): Query<PageQuery>,
    JsonPayload(payload): JsonPayload,
) -> AdminResult<Response> {
    let window = checked_window(&query)?;
    let filter = build_search_filter(&payload)?;

    if let Filter::Contains { field, pattern } = &filter {
        tracing::debug!(%field, pattern = pattern.as_str(), page = window.page, "searching users");
    }

    fetch_page(&state, &filter, window).await
}

/// Apply a partial update
///
/// PATCH /users/{id}
pub async fn update_user(
    State(state): State<UsersState>,
    RecordId(id): RecordId,
    validated: Validated<User>,
) -> AdminResult<Json<User>> {
    let patch = validated.into_inner();
    let fields: Vec<&str> = patch.keys().map(String::as_str).collect();
    tracing::info!(%id, ?fields, "updating user");

    state
        .store
        .update_by_id(&id, &patch)
        .await?
        .map(Json)
        .ok_or(AdminError::NotFound {
            resource: RESOURCE,
            id,
        })
}

/// Delete a user
///
/// DELETE /users/{id}
///
/// Always 204, whether or not the record existed.
pub async fn delete_user(
    State(state): State<UsersState>,
    RecordId(id): RecordId,
) -> AdminResult<StatusCode> {
    let removed = state.store.delete_by_id(&id).await?;

    tracing::info!(%id, removed, "user delete");
    Ok(StatusCode::NO_CONTENT)
}

/// Resolve the requested page, rejecting pages below 1
fn checked_window(query: &PageQuery) -> AdminResult<PageWindow> {
    let window = query.window();
    if !window.is_valid {
        return Err(AdminError::InvalidPage { page: window.page });
    }
    Ok(window)
}

async fn fetch_page(state: &UsersState, filter: &Filter, window: PageWindow) -> AdminResult<Response> {
    let total = state.store.count(filter).await?;
    let users = state
        .store
        .find(filter, Sort::NewestFirst, window.skip, window.limit)
        .await?;

    tracing::debug!(page = window.page, total, returned = users.len(), "user page");
    Ok(page_response(users, total))
}
