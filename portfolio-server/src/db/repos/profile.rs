//! Singleton profile, keyed by `key = "primary"`

use chrono::{DateTime, Utc};
use portfolio_core::models::{timestamp, Profile, ProfileUpdate, PROFILE_KEY};
use portfolio_core::Document;
use serde_json::Value;
use uuid::Uuid;

use super::{decode, encode, DbError};
use crate::db::store::{DocumentStore, Filter, Update};

pub struct ProfileRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProfileRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    fn key_filter() -> Filter {
        Filter::all().eq("key", PROFILE_KEY)
    }

    /// Keyed upsert: concurrent first reads converge on one document.
    async fn upsert_with(&self, update: Update, now: DateTime<Utc>) -> Result<Profile, DbError> {
        let update = update.set_on_insert(encode(&Profile::blank(Uuid::new_v4(), now))?);
        let stored = self
            .store
            .update_one(Profile::COLLECTION, &Self::key_filter(), &update, true)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource: Profile::RESOURCE,
                id: PROFILE_KEY.to_string(),
            })?;
        decode(stored)
    }

    /// Return the profile, creating a blank one on first access
    pub async fn get_or_create(&self) -> Result<Profile, DbError> {
        self.upsert_with(Update::new(), timestamp::now()).await
    }

    /// Apply the fields present in `changes`, creating the profile if needed.
    /// The document id never changes once created.
    pub async fn upsert(&self, changes: &ProfileUpdate) -> Result<Profile, DbError> {
        let now = timestamp::now();
        let update = Update::new()
            .set_all(encode(changes)?)
            .set("updatedAt", Value::String(timestamp::format(&now)));
        self.upsert_with(update, now).await
    }
}
