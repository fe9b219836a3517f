//! Handlers for `/content`
//!
//! Content is read as a singleton banner: the listing returns at most one
//! record, the oldest. Only updates need a session. There is no delete.

use axum::Json;
use axum::extract::State;

use super::ContentState;
use crate::core::error::{AdminError, AdminResult};
use crate::core::extractors::RecordId;
use crate::core::store::{Filter, Sort};
use crate::core::validation::Validated;
use crate::entities::{Content, ContentDraft};

/// Create a content record
///
/// POST /content
pub async fn create_content(
    State(state): State<ContentState>,
    validated: Validated<Content>,
) -> AdminResult<Json<Content>> {
    let draft = ContentDraft::from_payload(validated.into_inner())?;
    let content = state.store.create(draft).await?;

    tracing::info!(id = %content.id, "content created");
    Ok(Json(content))
}

/// Read the banner
///
/// GET /content
pub async fn read_content(State(state): State<ContentState>) -> AdminResult<Json<Vec<Content>>> {
    let content = state.store.find(&Filter::All, Sort::OldestFirst, 0, 1).await?;
    Ok(Json(content))
}

/// Apply a partial update; `publishedDate` must always be supplied
///
/// PATCH /content/{id}
pub async fn update_content(
    State(state): State<ContentState>,
    RecordId(id): RecordId,
    validated: Validated<Content>,
) -> AdminResult<Json<Content>> {
    let patch = validated.into_inner();
    tracing::info!(%id, fields = patch.len(), "updating content");

    state
        .store
        .update_by_id(&id, &patch)
        .await?
        .map(Json)
        .ok_or(AdminError::NotFound {
            resource: "content",
            id,
        })
}
