//! Recommendation endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use portfolio_core::models::{NewRecommendation, Recommendation};
use serde::Deserialize;

use super::crud;
use crate::db::repos::Repo;
use crate::db::store::{Direction, Filter, FindOptions};
use crate::http::extractors::ValidQuery;
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub featured: Option<bool>,
}

/// GET /api/recommendations - newest first
async fn list_recommendations(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<RecommendationQuery>,
) -> ApiResult<Vec<Recommendation>> {
    let filter = Filter::all().eq_opt("featured", query.featured);
    let options = FindOptions::default().sort_by("createdAt", Direction::Desc);
    let store = state.store().await?;
    let items = Repo::<Recommendation>::new(store.as_ref())
        .list(&filter, &options)
        .await?;
    Ok(ApiResponse::ok(items))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/recommendations",
            get(list_recommendations).post(crud::create_one::<Recommendation, NewRecommendation>),
        )
        .route(
            "/recommendations/{id}",
            get(crud::get_one::<Recommendation>)
                .put(crud::update_one::<Recommendation>)
                .delete(crud::delete_one::<Recommendation>),
        )
}
