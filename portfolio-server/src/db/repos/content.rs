//! Freeform page content, one document per section

use portfolio_core::models::{timestamp, Content, ContentSection, UpsertContent};
use portfolio_core::Document;
use serde_json::Value;
use uuid::Uuid;

use super::{decode, DbError, Repo};
use crate::db::store::{Direction, DocumentStore, Filter, FindOptions, JsonMap, Update};

pub struct ContentRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ContentRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Content>, DbError> {
        let options = FindOptions::default().sort_by("section", Direction::Asc);
        Repo::<Content>::new(self.store)
            .list(&Filter::all(), &options)
            .await
    }

    pub async fn get(&self, section: ContentSection) -> Result<Option<Content>, DbError> {
        Repo::<Content>::new(self.store)
            .find_one(&Filter::all().eq("section", section.as_str()))
            .await
    }

    /// Replace the section's data, creating the section on first write
    pub async fn upsert_section(&self, payload: UpsertContent) -> Result<Content, DbError> {
        let now = Value::String(timestamp::format(&timestamp::now()));
        let filter = Filter::all().eq("section", payload.section.as_str());

        let mut defaults = JsonMap::new();
        defaults.insert("_id".into(), Value::String(Uuid::new_v4().to_string()));
        defaults.insert("createdAt".into(), now.clone());

        let update = Update::new()
            .set("data", payload.data)
            .set("updatedAt", now)
            .set_on_insert(defaults);
        let stored = self
            .store
            .update_one(Content::COLLECTION, &filter, &update, true)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: Content::RESOURCE,
                id: payload.section.as_str().to_string(),
            })?;
        decode(stored)
    }
}
