//! Admin accounts and login sessions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{self as check, ValidationError};
use super::{timestamp, Document, Validate};

/// Stored account. Never serialized to clients; see [`UserView`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Argon2 PHC string
    pub password_hash: String,
    /// SHA-256 hex of the outstanding reset token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_password_token: Option<String>,
    #[serde(
        default,
        with = "timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub reset_password_expires: Option<DateTime<Utc>>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Document for User {
    const COLLECTION: &'static str = "users";
    const RESOURCE: &'static str = "User";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), ValidationError> {
        check::email("email", &self.email)?;
        check::max_len("name", &self.name, 100)?;
        check::required("passwordHash", &self.password_hash, 512)
    }
}

impl User {
    /// Normalized form used for storage and lookups
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

/// What the API returns for the signed-in user
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            created_at: u.created_at,
        }
    }
}

/// Login session. The cookie carries the raw token; only its hash is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub token_hash: String,
    pub user_id: Uuid,
    #[serde(with = "timestamp")]
    pub expires_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Document for Session {
    const COLLECTION: &'static str = "sessions";
    const RESOURCE: &'static str = "Session";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Password rules for account creation and resets
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < 8 {
        return Err(ValidationError::InvalidFormat {
            field: "password",
            reason: "must be at least 8 characters",
        });
    }
    check::max_len("password", password, 128)
}
