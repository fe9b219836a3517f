//! Route tables for the record resources
//!
//! Gated routes carry the session middleware as a route layer, so unknown
//! paths still answer 404 rather than 401.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::core::auth::{AuthGate, require_session};
use crate::handlers::content::{create_content, read_content, update_content};
use crate::handlers::users::{
    count_users, create_user, delete_user, list_users, read_user, search_users, update_user,
};
use crate::handlers::{ContentState, UsersState};

/// Build user routes
///
/// - POST /users                    (public)
/// - GET /users, GET /users/count, POST /users/find,
///   GET/PATCH/DELETE /users/{id}   (session)
///
/// `/users/count` and `/users/find` are static segments and win over `{id}`.
pub fn build_user_routes(state: UsersState, gate: AuthGate) -> Router {
    let gated = Router::new()
        .route("/users", get(list_users))
        .route("/users/count", get(count_users))
        .route("/users/find", post(search_users))
        .route(
            "/users/{id}",
            get(read_user).patch(update_user).delete(delete_user),
        )
        .route_layer(from_fn_with_state(gate, require_session));

    let public = Router::new().route("/users", post(create_user));

    gated.merge(public).with_state(state)
}

/// Build content routes
///
/// - POST /content, GET /content (public)
/// - PATCH /content/{id}         (session)
pub fn build_content_routes(state: ContentState, gate: AuthGate) -> Router {
    let gated = Router::new()
        .route("/content/{id}", patch(update_content))
        .route_layer(from_fn_with_state(gate, require_session));

    let public = Router::new().route("/content", get(read_content).post(create_content));

    gated.merge(public).with_state(state)
}

/// Build health check routes
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "admin-records"
    }))
}
