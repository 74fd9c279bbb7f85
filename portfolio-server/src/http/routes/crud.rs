//! Generic document handlers shared by the collection routes
//!
//! Reads are public; writes take an [`AuthUser`]. Updates are merge-patches:
//! the stored document is patched, revalidated, then replaced whole.

use std::sync::Arc;

use axum::extract::State;
use portfolio_core::models::{merge_patch, timestamp, IntoDocument};
use portfolio_core::{Document, Validate};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::db::repos::Repo;
use crate::db::store::JsonMap;
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidId, ValidJson};
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

/// Build, validate and store a document from a create payload
pub async fn insert_new<D, P>(state: &AppState, payload: P) -> Result<D, ApiError>
where
    D: Document + Validate,
    P: IntoDocument<D>,
{
    let doc = payload.into_document(Uuid::new_v4(), timestamp::now());
    doc.validate()?;
    let store = state.store().await?;
    Repo::new(store.as_ref()).insert(&doc).await?;
    tracing::debug!(collection = D::COLLECTION, id = %doc.id(), "Document created");
    Ok(doc)
}

pub async fn fetch<D: Document>(state: &AppState, id: Uuid) -> Result<D, ApiError> {
    let store = state.store().await?;
    Ok(Repo::<D>::new(store.as_ref()).get(id).await?)
}

/// Patch, revalidate and replace. Protected fields are never touched.
pub async fn patch<D>(state: &AppState, id: Uuid, changes: &JsonMap) -> Result<D, ApiError>
where
    D: Document + Validate,
{
    let store = state.store().await?;
    let repo = Repo::<D>::new(store.as_ref());
    let existing = repo.get(id).await?;
    let updated = merge_patch(&existing, changes, timestamp::now())
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    updated.validate()?;
    repo.replace(&updated).await?;
    Ok(updated)
}

pub async fn remove<D: Document>(state: &AppState, id: Uuid) -> Result<(), ApiError> {
    let store = state.store().await?;
    Repo::<D>::new(store.as_ref()).delete(id).await?;
    tracing::debug!(collection = D::COLLECTION, id = %id, "Document deleted");
    Ok(())
}

/// GET /{collection}/{id}
pub async fn get_one<D: Document>(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> ApiResult<D> {
    Ok(ApiResponse::ok(fetch(&state, id).await?))
}

/// POST /{collection}
pub async fn create_one<D, P>(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidJson(payload): ValidJson<P>,
) -> ApiResult<D>
where
    D: Document + Validate,
    P: IntoDocument<D> + DeserializeOwned + Send + 'static,
{
    let doc = insert_new(&state, payload).await?;
    Ok(ApiResponse::created(doc).with_message(format!("{} created", D::RESOURCE)))
}

/// PUT /{collection}/{id}
pub async fn update_one<D: Document + Validate>(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidId(id): ValidId,
    ValidJson(changes): ValidJson<JsonMap>,
) -> ApiResult<D> {
    let doc = patch(&state, id, &changes).await?;
    Ok(ApiResponse::ok(doc).with_message(format!("{} updated", D::RESOURCE)))
}

/// DELETE /{collection}/{id}
pub async fn delete_one<D: Document>(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidId(id): ValidId,
) -> ApiResult<()> {
    remove::<D>(&state, id).await?;
    Ok(ApiResponse::message(format!("{} deleted", D::RESOURCE)))
}
