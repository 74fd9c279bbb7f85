//! Work history endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use portfolio_core::models::{Experience, NewExperience};

use super::crud;
use crate::db::repos::Repo;
use crate::db::store::{Direction, Filter, FindOptions};
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

/// GET /api/experiences - most recent start first
async fn list_experiences(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Experience>> {
    let options = FindOptions::default().sort_by("startDate", Direction::Desc);
    let store = state.store().await?;
    let items = Repo::<Experience>::new(store.as_ref())
        .list(&Filter::all(), &options)
        .await?;
    Ok(ApiResponse::ok(items))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/experiences",
            get(list_experiences).post(crud::create_one::<Experience, NewExperience>),
        )
        .route(
            "/experiences/{id}",
            get(crud::get_one::<Experience>)
                .put(crud::update_one::<Experience>)
                .delete(crud::delete_one::<Experience>),
        )
}
