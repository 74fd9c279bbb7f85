//! Project showcase endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use portfolio_core::models::{NewProject, Project, ProjectStatus};
use serde::Deserialize;

use super::crud;
use crate::db::repos::Repo;
use crate::db::store::{Direction, Filter, FindOptions};
use crate::http::extractors::ValidQuery;
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ProjectQuery {
    pub status: Option<ProjectStatus>,
    pub featured: Option<bool>,
}

/// GET /api/projects - manual order first, newest first within an order
async fn list_projects(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<ProjectQuery>,
) -> ApiResult<Vec<Project>> {
    let filter = Filter::all()
        .eq_opt("status", query.status.map(|s| s.as_str()))
        .eq_opt("featured", query.featured);
    let options = FindOptions::default()
        .sort_by("order", Direction::Asc)
        .sort_by("createdAt", Direction::Desc);

    let store = state.store().await?;
    let projects = Repo::<Project>::new(store.as_ref())
        .list(&filter, &options)
        .await?;
    Ok(ApiResponse::ok(projects))
}

/// Project routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/projects",
            get(list_projects).post(crud::create_one::<Project, NewProject>),
        )
        .route(
            "/projects/{id}",
            get(crud::get_one::<Project>)
                .put(crud::update_one::<Project>)
                .delete(crud::delete_one::<Project>),
        )
}
