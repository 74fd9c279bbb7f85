//! Session and account endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use portfolio_core::models::UserView;
use serde::Deserialize;

use crate::auth::{cookie, Auth};
use crate::http::error::ApiError;
use crate::http::extractors::{AuthUser, ValidJson};
use crate::http::response::{ApiResponse, ApiResult};
use crate::http::server::AppState;

/// Same answer whether or not the account exists
pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent.";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    #[serde(default)]
    pub otp_code: String,
}

/// POST /api/auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }
    let store = state.store().await?;
    let (user, token) = Auth::new(store.as_ref(), &state.auth)
        .login(&req.email, &req.password)
        .await?;

    Ok((
        [(SET_COOKIE, state.auth.session_cookie(&token))],
        ApiResponse::ok(UserView::from(user)).with_message("Logged in"),
    ))
}

/// POST /api/auth/logout - always clears the cookie
async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = cookie::session_token(&headers) {
        let store = state.store().await?;
        Auth::new(store.as_ref(), &state.auth).logout(&token).await?;
    }
    Ok((
        [(SET_COOKIE, state.auth.clear_cookie())],
        ApiResponse::message("Logged out"),
    ))
}

/// GET /api/auth/me
async fn me(AuthUser(user): AuthUser) -> ApiResult<UserView> {
    Ok(ApiResponse::ok(UserView::from(user)))
}

/// POST /api/auth/forgot-password
async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<ForgotPasswordRequest>,
) -> ApiResult<()> {
    if req.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }
    let store = state.store().await?;
    // Delivery of the token is left to an outside mailer
    Auth::new(store.as_ref(), &state.auth)
        .issue_reset_token(&req.email)
        .await?;
    Ok(ApiResponse::message(RESET_REQUESTED_MESSAGE))
}

/// POST /api/auth/reset-password
async fn reset_password(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<ResetPasswordRequest>,
) -> ApiResult<()> {
    if req.token.is_empty() {
        return Err(ApiError::BadRequest("Reset token is required".to_string()));
    }
    let store = state.store().await?;
    Auth::new(store.as_ref(), &state.auth)
        .reset_password(&req.token, &req.password)
        .await?;
    Ok(ApiResponse::message("Password has been reset"))
}

/// POST /api/auth/delete-account - needs a session and the one-time code
async fn delete_account(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidJson(req): ValidJson<DeleteAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store().await?;
    Auth::new(store.as_ref(), &state.auth)
        .delete_account(user.id, &req.otp_code)
        .await?;
    Ok((
        [(SET_COOKIE, state.auth.clear_cookie())],
        ApiResponse::message("Account deleted"),
    ))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .route("/auth/forgot-password", post(forgot_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/delete-account", post(delete_account))
}
