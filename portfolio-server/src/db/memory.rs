//! In-process document store
//!
//! Same semantics as the MongoDB backend for the operations the API uses,
//! including unique indexes. Data lives as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{DocumentStore, Filter, FindOptions, JsonMap, StoreError, StoreResult, Update};

#[derive(Default)]
struct Collection {
    docs: Vec<JsonMap>,
    unique: Vec<String>,
}

impl Collection {
    /// Reject `doc` if it repeats a uniquely indexed value held by another
    /// document. `skip` is the position of the document being rewritten.
    fn check_unique(&self, doc: &JsonMap, skip: Option<usize>) -> StoreResult<()> {
        let id_clash = self
            .docs
            .iter()
            .enumerate()
            .any(|(i, other)| Some(i) != skip && other.get("_id").is_some() && other.get("_id") == doc.get("_id"));
        if id_clash {
            return Err(StoreError::Duplicate("_id".to_string()));
        }

        for field in &self.unique {
            let Some(value) = doc.get(field).filter(|v| !v.is_null()) else {
                continue;
            };
            let clash = self
                .docs
                .iter()
                .enumerate()
                .any(|(i, other)| Some(i) != skip && other.get(field) == Some(value));
            if clash {
                return Err(StoreError::Duplicate(field.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        if !coll.unique.iter().any(|f| f == field) {
            coll.unique.push(field.to_string());
        }
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<JsonMap>> {
        let collections = self.collections.read().await;
        let Some(coll) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut found: Vec<JsonMap> = coll
            .docs
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal keys
        found.sort_by(|a, b| options.compare(a, b));
        if let Some(limit) = options.limit.filter(|l| *l > 0) {
            found.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        Ok(found)
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<JsonMap>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|coll| coll.docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn insert_one(&self, collection: &str, doc: JsonMap) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();
        coll.check_unique(&doc, None)?;
        coll.docs.push(doc);
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> StoreResult<Option<JsonMap>> {
        let mut collections = self.collections.write().await;
        let coll = collections.entry(collection.to_string()).or_default();

        match coll.docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                let mut updated = coll.docs[index].clone();
                update.apply(&mut updated)?;
                coll.check_unique(&updated, Some(index))?;
                coll.docs[index] = updated.clone();
                Ok(Some(updated))
            }
            None if upsert => {
                let seeded = update.seed(filter)?;
                coll.check_unique(&seeded, None)?;
                coll.docs.push(seeded.clone());
                Ok(Some(seeded))
            }
            None => Ok(None),
        }
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut modified = 0;
        for doc in coll.docs.iter_mut().filter(|doc| filter.matches(doc)) {
            if update.apply(doc)? {
                modified += 1;
            }
        }
        Ok(modified)
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        doc: JsonMap,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(false);
        };
        let Some(index) = coll.docs.iter().position(|d| filter.matches(d)) else {
            return Ok(false);
        };
        coll.check_unique(&doc, Some(index))?;
        coll.docs[index] = doc;
        Ok(true)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(false);
        };
        match coll.docs.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                coll.docs.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(coll) = collections.get_mut(collection) else {
            return Ok(0);
        };
        let before = coll.docs.len();
        coll.docs.retain(|d| !filter.matches(d));
        Ok((before - coll.docs.len()) as u64)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|coll| coll.docs.iter().filter(|d| filter.matches(d)).count() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::Direction;
    use serde_json::{json, Value};

    fn doc(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn insert_find_sorted_limited() {
        let store = MemoryStore::new();
        for order in [3, 1, 2] {
            store
                .insert_one("links", doc(json!({"_id": format!("id{order}"), "order": order})))
                .await
                .unwrap();
        }

        let options = FindOptions::default().sort_by("order", Direction::Desc).limit(2);
        let found = store.find("links", &Filter::all(), &options).await.unwrap();
        let orders: Vec<_> = found.iter().map(|d| d["order"].as_i64().unwrap()).collect();
        assert_eq!(orders, vec![3, 2]);
    }

    #[tokio::test]
    async fn missing_collection_is_empty() {
        let store = MemoryStore::new();
        assert!(store
            .find("nothing", &Filter::all(), &FindOptions::default())
            .await
            .unwrap()
            .is_empty());
        assert_eq!(store.count("nothing", &Filter::all()).await.unwrap(), 0);
        assert!(!store.delete_one("nothing", &Filter::all()).await.unwrap());
    }

    #[tokio::test]
    async fn unique_index_rejects_duplicates() {
        let store = MemoryStore::new();
        store.ensure_unique_index("users", "email").await.unwrap();
        store
            .insert_one("users", doc(json!({"_id": "a", "email": "ada@example.com"})))
            .await
            .unwrap();

        let err = store
            .insert_one("users", doc(json!({"_id": "b", "email": "ada@example.com"})))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(field) if field == "email"));
    }

    #[tokio::test]
    async fn upsert_creates_once_then_updates() {
        let store = MemoryStore::new();
        let filter = Filter::all().eq("section", "hero");
        let update = Update::new()
            .set("data", json!({"v": 1}))
            .set_on_insert(doc(json!({"_id": "first"})));

        let created = store.update_one("contents", &filter, &update, true).await.unwrap().unwrap();
        assert_eq!(created["_id"], "first");

        let update = Update::new()
            .set("data", json!({"v": 2}))
            .set_on_insert(doc(json!({"_id": "second"})));
        let updated = store.update_one("contents", &filter, &update, true).await.unwrap().unwrap();
        assert_eq!(updated["_id"], "first");
        assert_eq!(updated["data"]["v"], 2);
        assert_eq!(store.count("contents", &Filter::all()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_without_upsert_misses() {
        let store = MemoryStore::new();
        let result = store
            .update_one("messages", &Filter::all().eq("_id", "x"), &Update::new().set("read", true), false)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn update_many_counts_modified() {
        let store = MemoryStore::new();
        for (id, read) in [("a", false), ("b", true), ("c", false)] {
            store
                .insert_one("messages", doc(json!({"_id": id, "read": read})))
                .await
                .unwrap();
        }

        let modified = store
            .update_many("messages", &Filter::all(), &Update::new().set("read", true))
            .await
            .unwrap();
        assert_eq!(modified, 2);
    }

    #[tokio::test]
    async fn replace_and_delete_many() {
        let store = MemoryStore::new();
        store
            .insert_one("sessions", doc(json!({"_id": "s1", "userId": "u"})))
            .await
            .unwrap();
        store
            .insert_one("sessions", doc(json!({"_id": "s2", "userId": "u"})))
            .await
            .unwrap();

        let replaced = store
            .replace_one("sessions", &Filter::all().eq("_id", "s1"), doc(json!({"_id": "s1", "userId": "v"})))
            .await
            .unwrap();
        assert!(replaced);

        let deleted = store
            .delete_many("sessions", &Filter::all().eq("userId", "u"))
            .await
            .unwrap();
        assert_eq!(deleted, 1);
    }
}
