//! MongoDB document store
//!
//! Documents cross the boundary as BSON built from the JSON maps; reads come
//! back as relaxed extended JSON, which for the string/number/bool/array
//! documents this API stores is plain JSON.

use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document as BsonDocument};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde_json::Value;

use super::store::{
    Direction, DocumentStore, Filter, FindOptions, JsonMap, StoreError, StoreResult, Update,
};

/// Server error code for unique index violations
const DUPLICATE_KEY: i32 = 11000;

const APP_NAME: &str = "portfolio-server";

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connect and verify the server answers a ping.
    ///
    /// The URI may carry credentials, so it is never logged or echoed in
    /// errors.
    pub async fn connect(uri: &str, database: &str, timeout: Duration) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|e| StoreError::Connection(format!("invalid connection string: {}", e.kind)))?;
        options.server_selection_timeout = Some(timeout);
        options.connect_timeout = Some(timeout);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options).map_err(connection_error)?;
        let store = Self {
            db: client.database(database),
        };
        store.ping().await?;
        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<BsonDocument> {
        self.db.collection::<BsonDocument>(name)
    }
}

fn connection_error(err: mongodb::error::Error) -> StoreError {
    StoreError::Connection(err.kind.to_string())
}

fn query_error(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        return StoreError::Duplicate(duplicate_field(&err).unwrap_or_else(|| "key".to_string()));
    }
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } => connection_error(err),
        _ => StoreError::Query(err.kind.to_string()),
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Best effort: the server names the index as `<field>_1`
fn duplicate_field(err: &mongodb::error::Error) -> Option<String> {
    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.message.clone(),
        ErrorKind::Command(e) => e.message.clone(),
        _ => return None,
    };
    let index = message.split("index: ").nth(1)?.split_whitespace().next()?;
    Some(index.trim_end_matches("_1").to_string())
}

fn to_bson(value: &Value) -> StoreResult<Bson> {
    bson::to_bson(value).map_err(|e| StoreError::Codec(e.to_string()))
}

fn to_bson_doc(map: &JsonMap) -> StoreResult<BsonDocument> {
    bson::to_document(map).map_err(|e| StoreError::Codec(e.to_string()))
}

fn to_json(document: BsonDocument) -> StoreResult<JsonMap> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Codec(format!("expected a document, got {other}"))),
    }
}

fn filter_doc(filter: &Filter) -> StoreResult<BsonDocument> {
    let mut out = BsonDocument::new();
    for (field, value) in filter.clauses() {
        out.insert(field.clone(), to_bson(value)?);
    }
    Ok(out)
}

fn sort_doc(options: &FindOptions) -> BsonDocument {
    let mut out = BsonDocument::new();
    for (field, direction) in &options.sort {
        let order = match direction {
            Direction::Asc => 1,
            Direction::Desc => -1,
        };
        out.insert(field.clone(), order);
    }
    out
}

/// Operator document for an update; `None` when it would be empty
fn update_doc(update: &Update, filter: &Filter, upsert: bool) -> StoreResult<Option<BsonDocument>> {
    let mut out = BsonDocument::new();
    if !update.set.is_empty() {
        out.insert("$set", to_bson_doc(&update.set)?);
    }
    if !update.unset.is_empty() {
        let fields: BsonDocument = update
            .unset
            .iter()
            .map(|f| (f.clone(), Bson::String(String::new())))
            .collect();
        out.insert("$unset", fields);
    }
    if !update.push.is_empty() {
        let mut fields = BsonDocument::new();
        for (field, value) in &update.push {
            fields.insert(field.clone(), to_bson(value)?);
        }
        out.insert("$push", fields);
    }
    if upsert {
        let defaults = update.insert_defaults(filter);
        if !defaults.is_empty() {
            out.insert("$setOnInsert", to_bson_doc(&defaults)?);
        }
    }
    Ok((!out.is_empty()).then_some(out))
}

#[async_trait]
impl DocumentStore for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connection_error)?;
        Ok(())
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> StoreResult<()> {
        let mut keys = BsonDocument::new();
        keys.insert(field, 1);
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection(collection)
            .create_index(index)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<JsonMap>> {
        let coll = self.collection(collection);
        let mut action = coll.find(filter_doc(filter)?).sort(sort_doc(options));
        if let Some(limit) = options.limit {
            action = action.limit(limit);
        }

        let cursor = action.await.map_err(query_error)?;
        let documents: Vec<BsonDocument> = cursor.try_collect().await.map_err(query_error)?;
        documents.into_iter().map(to_json).collect()
    }

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<JsonMap>> {
        self.collection(collection)
            .find_one(filter_doc(filter)?)
            .await
            .map_err(query_error)?
            .map(to_json)
            .transpose()
    }

    async fn insert_one(&self, collection: &str, doc: JsonMap) -> StoreResult<()> {
        self.collection(collection)
            .insert_one(to_bson_doc(&doc)?)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> StoreResult<Option<JsonMap>> {
        let Some(operators) = update_doc(update, filter, upsert)? else {
            return self.find_one(collection, filter).await;
        };

        self.collection(collection)
            .find_one_and_update(filter_doc(filter)?, operators)
            .upsert(upsert)
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error)?
            .map(to_json)
            .transpose()
    }

    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<u64> {
        let Some(operators) = update_doc(update, filter, false)? else {
            return Ok(0);
        };
        let result = self
            .collection(collection)
            .update_many(filter_doc(filter)?, operators)
            .await
            .map_err(query_error)?;
        Ok(result.modified_count)
    }

    async fn replace_one(
        &self,
        collection: &str,
        filter: &Filter,
        doc: JsonMap,
    ) -> StoreResult<bool> {
        let result = self
            .collection(collection)
            .replace_one(filter_doc(filter)?, to_bson_doc(&doc)?)
            .await
            .map_err(query_error)?;
        Ok(result.matched_count > 0)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<bool> {
        let result = self
            .collection(collection)
            .delete_one(filter_doc(filter)?)
            .await
            .map_err(query_error)?;
        Ok(result.deleted_count > 0)
    }

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        let result = self
            .collection(collection)
            .delete_many(filter_doc(filter)?)
            .await
            .map_err(query_error)?;
        Ok(result.deleted_count)
    }

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64> {
        self.collection(collection)
            .count_documents(filter_doc(filter)?)
            .await
            .map_err(query_error)
    }
}
