//! Admin authentication
//!
//! - Argon2id password hashes
//! - Opaque session tokens in an HttpOnly cookie, stored hashed
//! - Time-limited password reset tokens, stored hashed
//! - Account deletion gated by a configured one-time code

pub mod cookie;
pub mod password;
pub mod token;

use chrono::Duration;
use portfolio_core::config::AuthSection;
use portfolio_core::models::{timestamp, validate_password, Session, User};
use portfolio_core::{Validate, ValidationError};
use thiserror::Error;
use uuid::Uuid;

use crate::db::repos::{DbError, SessionRepo, UserRepo};
use crate::db::store::DocumentStore;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

/// Token lifetimes and cookie policy
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub session_ttl: Duration,
    pub reset_token_ttl: Duration,
    pub delete_account_code: String,
    pub secure_cookies: bool,
}

impl From<&AuthSection> for AuthSettings {
    fn from(section: &AuthSection) -> Self {
        Self {
            session_ttl: Duration::hours(section.session_ttl_hours),
            reset_token_ttl: Duration::minutes(section.reset_token_ttl_minutes),
            delete_account_code: section.delete_account_code.clone(),
            secure_cookies: section.secure_cookies,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self::from(&AuthSection::default())
    }
}

impl AuthSettings {
    pub fn session_cookie(&self, token: &str) -> String {
        cookie::session_cookie(token, self.session_ttl.num_seconds(), self.secure_cookies)
    }

    pub fn clear_cookie(&self) -> String {
        cookie::clear_session_cookie(self.secure_cookies)
    }
}

/// Auth operations against one store handle
pub struct Auth<'a> {
    store: &'a dyn DocumentStore,
    settings: &'a AuthSettings,
}

impl<'a> Auth<'a> {
    pub fn new(store: &'a dyn DocumentStore, settings: &'a AuthSettings) -> Self {
        Self { store, settings }
    }

    fn users(&self) -> UserRepo<'a> {
        UserRepo::new(self.store)
    }

    fn sessions(&self) -> SessionRepo<'a> {
        SessionRepo::new(self.store)
    }

    /// Create an admin account
    pub async fn create_user(&self, email: &str, name: &str, password: &str) -> Result<User, AuthError> {
        validate_password(password)?;
        let now = timestamp::now();
        let user = User {
            id: Uuid::new_v4(),
            email: User::normalize_email(email),
            name: name.trim().to_string(),
            password_hash: password::hash_password_blocking(password.to_string()).await?,
            reset_password_token: None,
            reset_password_expires: None,
            created_at: now,
            updated_at: now,
        };
        user.validate()?;
        self.users().create(&user).await?;
        tracing::info!(user_id = %user.id, "Admin account created");
        Ok(user)
    }

    /// Check credentials and open a session. Returns the user and the raw
    /// session token for the cookie.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self
            .users()
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let valid =
            password::verify_password_blocking(password.to_string(), user.password_hash.clone())
                .await?;
        if !valid {
            tracing::debug!(user_id = %user.id, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let raw = token::generate_token();
        let now = timestamp::now();
        let session = Session {
            id: Uuid::new_v4(),
            token_hash: token::hash_token(&raw),
            user_id: user.id,
            expires_at: now + self.settings.session_ttl,
            created_at: now,
        };
        self.sessions().create(&session).await?;
        tracing::info!(user_id = %user.id, "Session opened");
        Ok((user, raw))
    }

    /// Returns whether a session was closed
    pub async fn logout(&self, raw_token: &str) -> Result<bool, AuthError> {
        Ok(self
            .sessions()
            .delete_by_token_hash(&token::hash_token(raw_token))
            .await?)
    }

    /// Resolve a session token to its user. Expired sessions are removed.
    pub async fn current_user(&self, raw_token: &str) -> Result<User, AuthError> {
        let hash = token::hash_token(raw_token);
        let session = self
            .sessions()
            .find_by_token_hash(&hash)
            .await?
            .filter(|s| token::constant_time_eq(s.token_hash.as_bytes(), hash.as_bytes()))
            .ok_or(AuthError::Unauthenticated)?;

        if session.is_expired(timestamp::now()) {
            self.sessions().delete_by_token_hash(&hash).await?;
            return Err(AuthError::Unauthenticated);
        }

        match self.users().get(session.user_id).await {
            Ok(user) => Ok(user),
            Err(DbError::NotFound { .. }) => Err(AuthError::Unauthenticated),
            Err(e) => Err(e.into()),
        }
    }

    /// Issue a reset token for `email`. `None` when no such account exists;
    /// callers must not reveal which case happened.
    pub async fn issue_reset_token(&self, email: &str) -> Result<Option<String>, AuthError> {
        let Some(user) = self.users().find_by_email(email).await? else {
            return Ok(None);
        };
        let raw = token::generate_token();
        let expires = timestamp::now() + self.settings.reset_token_ttl;
        self.users()
            .set_reset_token(user.id, &token::hash_token(&raw), expires)
            .await?;
        tracing::info!(user_id = %user.id, "Password reset token issued");
        Ok(Some(raw))
    }

    /// Consume a reset token, set the new password and close every session
    /// of the account.
    pub async fn reset_password(&self, raw_token: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;
        let hash = token::hash_token(raw_token);
        let user = self
            .users()
            .find_by_reset_token(&hash)
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let expired = user
            .reset_password_expires
            .map_or(true, |expires| expires <= timestamp::now());
        if expired {
            return Err(AuthError::InvalidResetToken);
        }

        let password_hash = password::hash_password_blocking(new_password.to_string()).await?;
        self.users().set_password(user.id, &password_hash).await?;
        let closed = self.sessions().delete_for_user(user.id).await?;
        tracing::info!(user_id = %user.id, closed_sessions = closed, "Password reset");
        Ok(())
    }

    /// Delete the account after checking the one-time code
    pub async fn delete_account(&self, user_id: Uuid, code: &str) -> Result<(), AuthError> {
        let expected = self.settings.delete_account_code.as_bytes();
        if !token::constant_time_eq(code.trim().as_bytes(), expected) {
            tracing::warn!(user_id = %user_id, "Account deletion rejected: wrong code");
            return Err(AuthError::InvalidCode);
        }
        self.users().delete(user_id).await?;
        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}
