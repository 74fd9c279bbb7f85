//! Login sessions, looked up by token hash

use portfolio_core::models::Session;
use portfolio_core::Document;
use uuid::Uuid;

use super::{DbError, Repo};
use crate::db::store::{DocumentStore, Filter};

pub struct SessionRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> SessionRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn by_hash(token_hash: &str) -> Filter {
        Filter::all().eq("tokenHash", token_hash)
    }

    pub async fn create(&self, session: &Session) -> Result<(), DbError> {
        Repo::new(self.store).insert(session).await
    }

    pub async fn find_by_token_hash(&self, token_hash: &str) -> Result<Option<Session>, DbError> {
        Repo::<Session>::new(self.store)
            .find_one(&Self::by_hash(token_hash))
            .await
    }

    /// Returns whether a session was removed
    pub async fn delete_by_token_hash(&self, token_hash: &str) -> Result<bool, DbError> {
        Ok(self
            .store
            .delete_one(Session::COLLECTION, &Self::by_hash(token_hash))
            .await?)
    }

    pub async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, DbError> {
        Ok(self
            .store
            .delete_many(
                Session::COLLECTION,
                &Filter::all().eq("userId", user_id.to_string()),
            )
            .await?)
    }
}
