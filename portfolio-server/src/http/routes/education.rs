//! Education timeline endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::Router;
use portfolio_core::models::{Education, NewEducation};

use super::crud;
use crate::db::repos::Repo;
use crate::db::store::{Direction, Filter, FindOptions};
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

async fn list_education(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Education>> {
    let options = FindOptions::default().sort_by("startDate", Direction::Desc);
    let store = state.store().await?;
    let items = Repo::<Education>::new(store.as_ref())
        .list(&Filter::all(), &options)
        .await?;
    Ok(ApiResponse::ok(items))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/education",
            get(list_education).post(crud::create_one::<Education, NewEducation>),
        )
        .route(
            "/education/{id}",
            get(crud::get_one::<Education>)
                .put(crud::update_one::<Education>)
                .delete(crud::delete_one::<Education>),
        )
}
