//! Profile endpoints (singleton document)

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use portfolio_core::models::{Profile, ProfileUpdate};
use portfolio_core::Validate;

use crate::db::repos::ProfileRepo;
use crate::http::extractors::{AuthUser, ValidJson};
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

/// GET /api/profile - created blank on first read
async fn get_profile(State(state): State<Arc<AppState>>) -> ApiResult<Profile> {
    let store = state.store().await?;
    let profile = ProfileRepo::new(store.as_ref()).get_or_create().await?;
    Ok(ApiResponse::ok(profile))
}

/// PUT /api/profile - keyed upsert of the fields present
async fn update_profile(
    State(state): State<Arc<AppState>>,
    _admin: AuthUser,
    ValidJson(changes): ValidJson<ProfileUpdate>,
) -> ApiResult<Profile> {
    changes.validate()?;
    let store = state.store().await?;
    let profile = ProfileRepo::new(store.as_ref()).upsert(&changes).await?;
    Ok(ApiResponse::ok(profile).with_message("Profile updated"))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/profile", get(get_profile).put(update_profile))
}
