//! Custom Axum extractors
//!
//! Rejections are turned into `ApiError` so malformed input still gets the
//! JSON error envelope.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use portfolio_core::models::User;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::error::ApiError;
use super::server::AppState;
use crate::auth::{cookie, Auth};

/// JSON body whose rejection is a 400 envelope
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string whose rejection is a 400 envelope
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection: QueryRejection| ApiError::BadRequest(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Document id from the `{id}` path segment
pub struct ValidId(pub Uuid);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::BadRequest("Invalid id".to_string()))?;

        let uuid = Uuid::parse_str(&id).map_err(|_| ApiError::BadRequest("Invalid id".to_string()))?;
        Ok(Self(uuid))
    }
}

/// The signed-in admin; rejects with 401 when the session cookie is missing,
/// unknown or expired.
pub struct AuthUser(pub User);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie::session_token(&parts.headers).ok_or_else(ApiError::unauthenticated)?;
        let store = state.store().await?;
        let user = Auth::new(store.as_ref(), &state.auth)
            .current_user(&token)
            .await?;
        Ok(Self(user))
    }
}
