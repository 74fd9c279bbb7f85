//! Typed repositories over the document store
//!
//! Each repository borrows the store handle for the duration of a request.
//! Patterns:
//! - One store call per operation where the store can express it
//! - Singletons and per-key documents use keyed upserts (no check-then-insert)
//! - Documents are validated by callers before they reach a repository

pub mod content;
pub mod messages;
pub mod profile;
pub mod sessions;
pub mod social_links;
pub mod users;

use std::marker::PhantomData;

use portfolio_core::{Document, ValidationError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::store::{DocumentStore, Filter, FindOptions, JsonMap, StoreError, Update};

pub use content::ContentRepo;
pub use messages::MessageRepo;
pub use profile::ProfileRepo;
pub use sessions::SessionRepo;
pub use social_links::SocialLinkRepo;
pub use users::UserRepo;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("database error: {0}")]
    Store(#[from] StoreError),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("stored document is malformed: {0}")]
    Malformed(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Serialize a document into its stored form
pub fn encode<T: Serialize>(value: &T) -> Result<JsonMap, DbError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(DbError::Malformed(format!("expected an object, got {other}"))),
        Err(e) => Err(DbError::Malformed(e.to_string())),
    }
}

pub fn decode<T: DeserializeOwned>(map: JsonMap) -> Result<T, DbError> {
    serde_json::from_value(Value::Object(map)).map_err(|e| DbError::Malformed(e.to_string()))
}

/// CRUD for any document type in its own collection
pub struct Repo<'a, D> {
    store: &'a dyn DocumentStore,
    _doc: PhantomData<D>,
}

impl<'a, D: Document> Repo<'a, D> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            _doc: PhantomData,
        }
    }

    fn not_found(id: Uuid) -> DbError {
        DbError::NotFound {
            resource: D::RESOURCE,
            id: id.to_string(),
        }
    }

    pub async fn list(&self, filter: &Filter, options: &FindOptions) -> Result<Vec<D>, DbError> {
        self.store
            .find(D::COLLECTION, filter, options)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn get(&self, id: Uuid) -> Result<D, DbError> {
        self.find_one(&Filter::by_id(id))
            .await?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn find_one(&self, filter: &Filter) -> Result<Option<D>, DbError> {
        self.store
            .find_one(D::COLLECTION, filter)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn insert(&self, doc: &D) -> Result<(), DbError> {
        self.store.insert_one(D::COLLECTION, encode(doc)?).await?;
        Ok(())
    }

    /// Overwrite the stored document with the same id
    pub async fn replace(&self, doc: &D) -> Result<(), DbError> {
        let id = doc.id();
        if self
            .store
            .replace_one(D::COLLECTION, &Filter::by_id(id), encode(doc)?)
            .await?
        {
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        if self.store.delete_one(D::COLLECTION, &Filter::by_id(id)).await? {
            Ok(())
        } else {
            Err(Self::not_found(id))
        }
    }

    /// Update one document by id and return it after the update
    pub async fn update(&self, id: Uuid, update: &Update) -> Result<D, DbError> {
        self.store
            .update_one(D::COLLECTION, &Filter::by_id(id), update, false)
            .await?
            .map(decode)
            .transpose()?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64, DbError> {
        Ok(self.store.count(D::COLLECTION, filter).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::db::store::Direction;
    use portfolio_core::models::{timestamp, IntoDocument, NewRecommendation, Recommendation};
    use serde_json::json;

    fn recommendation(name: &str, featured: bool) -> Recommendation {
        let payload: NewRecommendation = serde_json::from_value(json!({
            "name": name,
            "position": "Engineer",
            "text": "Great to work with",
            "featured": featured
        }))
        .unwrap();
        payload.into_document(Uuid::new_v4(), timestamp::now())
    }

    #[tokio::test]
    async fn crud_round_trip() {
        let store = MemoryStore::new();
        let repo = Repo::<Recommendation>::new(&store);

        let mut rec = recommendation("Grace", true);
        repo.insert(&rec).await.unwrap();
        assert_eq!(repo.get(rec.id).await.unwrap(), rec);

        rec.text = "Still great".into();
        repo.replace(&rec).await.unwrap();
        assert_eq!(repo.get(rec.id).await.unwrap().text, "Still great");

        repo.delete(rec.id).await.unwrap();
        assert!(matches!(
            repo.get(rec.id).await,
            Err(DbError::NotFound { resource: "Recommendation", .. })
        ));
    }

    #[tokio::test]
    async fn missing_documents_are_not_found() {
        let store = MemoryStore::new();
        let repo = Repo::<Recommendation>::new(&store);
        let rec = recommendation("Linus", false);

        assert!(matches!(repo.replace(&rec).await, Err(DbError::NotFound { .. })));
        assert!(matches!(repo.delete(rec.id).await, Err(DbError::NotFound { .. })));
        assert!(matches!(
            repo.update(rec.id, &Update::new().set("featured", true)).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn list_filters_and_sorts() {
        let store = MemoryStore::new();
        let repo = Repo::<Recommendation>::new(&store);
        for (name, featured) in [("b", true), ("a", true), ("c", false)] {
            repo.insert(&recommendation(name, featured)).await.unwrap();
        }

        let featured = repo
            .list(
                &Filter::all().eq("featured", true),
                &FindOptions::default().sort_by("name", Direction::Asc),
            )
            .await
            .unwrap();
        let names: Vec<_> = featured.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(repo.count(&Filter::all()).await.unwrap(), 3);
    }
}
