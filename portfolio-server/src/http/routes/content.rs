//! Page content endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use portfolio_core::models::{Content, ContentSection, UpsertContent};
use portfolio_core::Validate;
use serde::{Deserialize, Serialize};

use crate::db::repos::ContentRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidJson, ValidQuery};
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    pub section: Option<ContentSection>,
}

/// One section when asked for, otherwise all of them
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ContentReply {
    Section(Content),
    All(Vec<Content>),
}

/// GET /api/content[?section=hero]
async fn get_content(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ContentQuery>,
) -> ApiResult<ContentReply> {
    let store = state.store().await?;
    let repo = ContentRepo::new(store.as_ref());
    let reply = match query.section {
        Some(section) => {
            let content = repo.get(section).await?.ok_or_else(|| ApiError::NotFound {
                resource: "Content",
                id: section.as_str().to_string(),
            })?;
            ContentReply::Section(content)
        }
        None => ContentReply::All(repo.list().await?),
    };
    Ok(ApiResponse::ok(reply))
}

/// POST /api/content - upsert by section
async fn upsert_content(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidJson(payload): ValidJson<UpsertContent>,
) -> ApiResult<Content> {
    payload.validate()?;
    let store = state.store().await?;
    let content = ContentRepo::new(store.as_ref())
        .upsert_section(payload)
        .await?;
    Ok(ApiResponse::ok(content).with_message("Content saved"))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/content", get(get_content).post(upsert_content))
}
