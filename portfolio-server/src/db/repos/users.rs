//! Admin accounts

use chrono::{DateTime, Utc};
use portfolio_core::models::{timestamp, User};
use serde_json::Value;
use uuid::Uuid;

use super::{DbError, Repo, SessionRepo};
use crate::db::store::{DocumentStore, Filter, Update};

pub struct UserRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> UserRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn repo(&self) -> Repo<'a, User> {
        Repo::new(self.store)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DbError> {
        self.repo().get(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        self.repo()
            .find_one(&Filter::all().eq("email", User::normalize_email(email)))
            .await
    }

    /// Insert a new account; a taken e-mail surfaces as a duplicate error
    pub async fn create(&self, user: &User) -> Result<(), DbError> {
        self.repo().insert(user).await
    }

    pub async fn count(&self) -> Result<u64, DbError> {
        self.repo().count(&Filter::all()).await
    }

    /// Store the hash of a freshly issued reset token
    pub async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), DbError> {
        let update = Update::new()
            .set("resetPasswordToken", token_hash)
            .set("resetPasswordExpires", Value::String(timestamp::format(&expires)));
        self.repo().update(id, &update).await.map(|_| ())
    }

    pub async fn find_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, DbError> {
        self.repo()
            .find_one(&Filter::all().eq("resetPasswordToken", token_hash))
            .await
    }

    /// Replace the password hash and consume any outstanding reset token
    pub async fn set_password(&self, id: Uuid, password_hash: &str) -> Result<User, DbError> {
        let update = Update::new()
            .set("passwordHash", password_hash)
            .set("updatedAt", Value::String(timestamp::format(&timestamp::now())))
            .unset("resetPasswordToken")
            .unset("resetPasswordExpires");
        self.repo().update(id, &update).await
    }

    /// Delete the account and every session it holds
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        self.repo().delete(id).await?;
        SessionRepo::new(self.store).delete_for_user(id).await?;
        Ok(())
    }
}
