//! Health check endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub target: Option<&'static str>,
    pub backend: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
}

/// GET /api/health - connects if needed and pings the database
async fn health(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    let store = state.store().await?;
    if let Err(e) = store.ping().await {
        tracing::warn!(error = %e, "Health check ping failed");
        return Err(crate::db::repos::DbError::from(e).into());
    }

    Ok(ApiResponse::ok(HealthResponse {
        status: "ok",
        database: "connected",
        target: state.db.active_target().map(|t| t.as_str()),
        backend: store.backend(),
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

/// Health routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
