//! Social link endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use portfolio_core::models::{NewSocialLink, SocialLink};
use serde::Deserialize;

use super::crud;
use crate::db::repos::SocialLinkRepo;
use crate::http::extractors::{AuthUser, ValidJson, ValidQuery};
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SocialLinkQuery {
    pub active: Option<bool>,
}

/// GET /api/social-links - by `order`
async fn list_links(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<SocialLinkQuery>,
) -> ApiResult<Vec<SocialLink>> {
    let store = state.store().await?;
    let links = SocialLinkRepo::new(store.as_ref()).list(query.active).await?;
    Ok(ApiResponse::ok(links))
}

/// POST /api/social-links - appended after the last link unless `order` is given
async fn create_link(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidJson(payload): ValidJson<NewSocialLink>,
) -> ApiResult<SocialLink> {
    let store = state.store().await?;
    let link = SocialLinkRepo::new(store.as_ref()).create(payload).await?;
    Ok(ApiResponse::created(link).with_message("Social link created"))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/social-links", get(list_links).post(create_link))
        .route(
            "/social-links/{id}",
            get(crud::get_one::<SocialLink>)
                .put(crud::update_one::<SocialLink>)
                .delete(crud::delete_one::<SocialLink>),
        )
}
