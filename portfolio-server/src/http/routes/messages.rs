//! Contact inbox endpoints
//!
//! Submitting a message is public; everything else needs a session.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use portfolio_core::models::{timestamp, Message, MessageFlags, NewMessage, NewReply};
use serde::Serialize;

use super::crud;
use crate::db::repos::MessageRepo;
use crate::http::extractors::{AuthUser, ValidId, ValidJson, ValidQuery};
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkResult {
    pub modified_count: u64,
}

/// GET /api/messages?read=&starred=&archived=
async fn list_messages(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidQuery(flags): ValidQuery<MessageFlags>,
) -> ApiResult<Vec<Message>> {
    let store = state.store().await?;
    let messages = MessageRepo::new(store.as_ref()).list(&flags).await?;
    Ok(ApiResponse::ok(messages))
}

/// POST /api/messages - contact form
async fn submit_message(
    State(state): State<Arc<AppState>>,
    ValidJson(payload): ValidJson<NewMessage>,
) -> ApiResult<Message> {
    let message = crud::insert_new::<Message, _>(&state, payload).await?;
    tracing::info!(message_id = %message.id, "Contact message received");
    Ok(ApiResponse::created(message).with_message("Message sent successfully"))
}

async fn get_message(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidId(id): ValidId,
) -> ApiResult<Message> {
    Ok(ApiResponse::ok(crud::fetch(&state, id).await?))
}

/// PUT /api/messages/{id} - inbox flags only
async fn update_flags(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidId(id): ValidId,
    ValidJson(flags): ValidJson<MessageFlags>,
) -> ApiResult<Message> {
    let store = state.store().await?;
    let message = MessageRepo::new(store.as_ref()).set_flags(id, &flags).await?;
    Ok(ApiResponse::ok(message))
}

async fn delete_message(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidId(id): ValidId,
) -> ApiResult<()> {
    crud::remove::<Message>(&state, id).await?;
    Ok(ApiResponse::message("Message deleted"))
}

/// POST /api/messages/{id}/reply
async fn reply_to_message(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidId(id): ValidId,
    ValidJson(payload): ValidJson<NewReply>,
) -> ApiResult<Message> {
    let reply = payload.into_reply(timestamp::now())?;
    let store = state.store().await?;
    let message = MessageRepo::new(store.as_ref()).reply(id, &reply).await?;
    Ok(ApiResponse::ok(message).with_message("Reply recorded"))
}

/// POST /api/messages/mark-all-read
async fn mark_all_read(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
) -> ApiResult<BulkResult> {
    let store = state.store().await?;
    let modified_count = MessageRepo::new(store.as_ref()).mark_all_read().await?;
    Ok(ApiResponse::ok(BulkResult { modified_count })
        .with_message(format!("{modified_count} messages marked as read")))
}

/// POST /api/messages/clear-all - archives the inbox
async fn clear_all(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
) -> ApiResult<BulkResult> {
    let store = state.store().await?;
    let modified_count = MessageRepo::new(store.as_ref()).clear_all().await?;
    Ok(ApiResponse::ok(BulkResult { modified_count })
        .with_message(format!("{modified_count} messages archived")))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/messages", get(list_messages).post(submit_message))
        .route("/messages/mark-all-read", post(mark_all_read))
        .route("/messages/clear-all", post(clear_all))
        .route(
            "/messages/{id}",
            get(get_message).put(update_flags).delete(delete_message),
        )
        .route("/messages/{id}/reply", post(reply_to_message))
}
