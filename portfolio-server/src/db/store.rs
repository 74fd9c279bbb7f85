//! Document store abstraction
//!
//! Documents are JSON objects. Filters are equality conjunctions over
//! top-level fields; updates use `$set`/`$unset`/`$push`/`$setOnInsert`
//! semantics. Both backends implement exactly this subset.

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// One stored document
pub type JsonMap = serde_json::Map<String, Value>;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("duplicate value violates unique index on {0}")]
    Duplicate(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("document could not be converted: {0}")]
    Codec(String),
}

/// Equality filter: every clause must match.
///
/// A clause with a `null` value also matches documents missing the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every document
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: Uuid) -> Self {
        Self::all().eq("_id", id.to_string())
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Add a clause only when a value is given
    pub fn eq_opt<V: Into<Value>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self,
        }
    }

    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    pub fn matches(&self, doc: &JsonMap) -> bool {
        self.clauses.iter().all(|(field, expected)| match doc.get(field) {
            Some(actual) => actual == expected,
            None => expected.is_null(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// Sort keys (applied in order) and an optional limit
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub sort: Vec<(String, Direction)>,
    pub limit: Option<i64>,
}

impl FindOptions {
    pub fn sort_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort.push((field.into(), direction));
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Compare two documents by the sort keys
    pub fn compare(&self, a: &JsonMap, b: &JsonMap) -> Ordering {
        for (field, direction) in &self.sort {
            let ord = compare_values(a.get(field), b.get(field));
            let ord = match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Cross-type order: missing/null < numbers < strings < objects < arrays < booleans
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None | Some(Value::Null) => 0,
            Some(Value::Number(_)) => 1,
            Some(Value::String(_)) => 2,
            Some(Value::Object(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Bool(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Top-level field update
#[derive(Debug, Clone, Default)]
pub struct Update {
    pub set: JsonMap,
    pub unset: Vec<String>,
    pub push: Vec<(String, Value)>,
    /// Applied only when an upsert inserts
    pub set_on_insert: JsonMap,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set.insert(field.into(), value.into());
        self
    }

    pub fn set_all(mut self, fields: JsonMap) -> Self {
        self.set.extend(fields);
        self
    }

    pub fn unset(mut self, field: impl Into<String>) -> Self {
        self.unset.push(field.into());
        self
    }

    pub fn push(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push.push((field.into(), value.into()));
        self
    }

    /// Insert-only defaults, applied when an upsert creates the document
    pub fn set_on_insert(mut self, defaults: JsonMap) -> Self {
        self.set_on_insert.extend(defaults);
        self
    }

    /// `set_on_insert` minus fields another operator or the filter already
    /// sets; a field may only be touched by one operator.
    pub fn insert_defaults(&self, filter: &Filter) -> JsonMap {
        self.set_on_insert
            .iter()
            .filter(|(field, _)| {
                !self.set.contains_key(*field)
                    && !self.unset.contains(*field)
                    && !self.push.iter().any(|(f, _)| f == *field)
                    && !filter.clauses().iter().any(|(f, _)| f == *field)
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// No operator besides `$setOnInsert`
    pub fn modifies_nothing(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty() && self.push.is_empty()
    }

    /// Apply `$set`, `$unset` and `$push` to `doc`. Returns whether anything
    /// changed.
    pub fn apply(&self, doc: &mut JsonMap) -> StoreResult<bool> {
        let mut changed = false;

        for (field, value) in &self.set {
            if doc.get(field) != Some(value) {
                doc.insert(field.clone(), value.clone());
                changed = true;
            }
        }

        for field in &self.unset {
            changed |= doc.remove(field).is_some();
        }

        for (field, value) in &self.push {
            match doc
                .entry(field.clone())
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                Value::Array(items) => {
                    items.push(value.clone());
                    changed = true;
                }
                _ => {
                    return Err(StoreError::Query(format!(
                        "cannot push to non-array field '{field}'"
                    )))
                }
            }
        }

        Ok(changed)
    }

    /// The document an upsert creates when nothing matched
    pub fn seed(&self, filter: &Filter) -> StoreResult<JsonMap> {
        let mut doc: JsonMap = filter
            .clauses()
            .iter()
            .filter(|(_, v)| !v.is_null())
            .cloned()
            .collect();
        doc.extend(self.insert_defaults(filter));
        self.apply(&mut doc)?;
        Ok(doc)
    }
}

/// Async access to a document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend name for diagnostics
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> StoreResult<()>;

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> StoreResult<()>;

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Vec<JsonMap>>;

    async fn find_one(&self, collection: &str, filter: &Filter) -> StoreResult<Option<JsonMap>>;

    async fn insert_one(&self, collection: &str, doc: JsonMap) -> StoreResult<()>;

    /// Update the first match and return it as it is after the update.
    /// With `upsert`, a missing document is created from the filter's
    /// equality fields, `set_on_insert`, and the update itself.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
        upsert: bool,
    ) -> StoreResult<Option<JsonMap>>;

    /// Returns the number of documents actually modified
    async fn update_many(
        &self,
        collection: &str,
        filter: &Filter,
        update: &Update,
    ) -> StoreResult<u64>;

    /// Returns whether a document matched
    async fn replace_one(&self, collection: &str, filter: &Filter, doc: JsonMap)
        -> StoreResult<bool>;

    async fn delete_one(&self, collection: &str, filter: &Filter) -> StoreResult<bool>;

    async fn delete_many(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;

    async fn count(&self, collection: &str, filter: &Filter) -> StoreResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> JsonMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn filter_matches_equality() {
        let d = doc(json!({"read": false, "archived": false, "name": "x"}));
        assert!(Filter::all().matches(&d));
        assert!(Filter::all().eq("read", false).matches(&d));
        assert!(!Filter::all().eq("read", true).matches(&d));
        assert!(Filter::all().eq("missing", Value::Null).matches(&d));
        assert!(!Filter::all().eq("missing", false).matches(&d));
    }

    #[test]
    fn eq_opt_skips_none() {
        let filter = Filter::all().eq_opt::<bool>("read", None).eq_opt("starred", Some(true));
        assert_eq!(filter.clauses().len(), 1);
    }

    #[test]
    fn sort_orders_by_keys() {
        let a = doc(json!({"order": 1, "createdAt": "2024-01-02T00:00:00.000Z"}));
        let b = doc(json!({"order": 1, "createdAt": "2024-01-01T00:00:00.000Z"}));
        let c = doc(json!({"order": 0}));
        let options = FindOptions::default()
            .sort_by("order", Direction::Asc)
            .sort_by("createdAt", Direction::Desc);

        let mut docs = vec![b.clone(), c.clone(), a.clone()];
        docs.sort_by(|x, y| options.compare(x, y));
        assert_eq!(docs, vec![c, a, b]);
    }

    #[test]
    fn numbers_compare_numerically() {
        assert_eq!(
            compare_values(Some(&json!(10)), Some(&json!(9))),
            Ordering::Greater
        );
        assert_eq!(compare_values(None, Some(&json!(0))), Ordering::Less);
    }

    #[test]
    fn update_applies_operators() {
        let mut d = doc(json!({"read": false, "replies": [], "token": "t"}));
        let update = Update::new()
            .set("read", true)
            .unset("token")
            .push("replies", json!({"message": "hi"}));

        assert!(update.apply(&mut d).unwrap());
        assert_eq!(d["read"], true);
        assert!(d.get("token").is_none());
        assert_eq!(d["replies"].as_array().unwrap().len(), 1);

        // Setting the same value again is not a modification
        assert!(!Update::new().set("read", true).apply(&mut d).unwrap());
    }

    #[test]
    fn push_to_scalar_fails() {
        let mut d = doc(json!({"replies": 3}));
        assert!(Update::new().push("replies", 1).apply(&mut d).is_err());
    }

    #[test]
    fn seed_combines_filter_and_defaults() {
        let filter = Filter::all().eq("section", "hero");
        let update = Update::new()
            .set("data", json!({"headline": "Hi"}))
            .set_on_insert(doc(json!({"_id": "abc", "data": {}, "createdAt": "now"})));

        let seeded = update.seed(&filter).unwrap();
        assert_eq!(seeded["section"], "hero");
        assert_eq!(seeded["_id"], "abc");
        assert_eq!(seeded["createdAt"], "now");
        // `data` came from $set, not the insert default
        assert_eq!(seeded["data"]["headline"], "Hi");
    }
}
