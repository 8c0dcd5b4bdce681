//! In-process document store used by the engine.
//!
//! The engine treats its database as an external collaborator with a small
//! contract: fetch-by-id, fetch-by-equality-filter, add-with-generated-id,
//! partial-field update, and atomic array-union append, plus a merge-upsert
//! used by the administrative catalog endpoints. [`DocumentStore`] implements
//! that contract over JSON documents held behind a `tokio` read-write lock.
//! It is created once at startup and injected through
//! [`crate::api::AppState`]; nothing in the crate reaches for it as a global.
//!
//! Updates are read-modify-write sequences with no document-level locking.
//! Two concurrent writers to the same document race, and the later write
//! wins. That limitation is inherited from the store contract and is
//! exercised (not fixed) by the attendance tests.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// Collection names used by the engine.
pub mod collections {
    /// Price catalog entries, one document per material key.
    pub const PRICES: &str = "prices";
    /// Quality coefficients, one document per project type.
    pub const COEFFICIENTS: &str = "coefficients";
    /// Saved estimates.
    pub const ESTIMATES: &str = "estimates";
    /// Labourer records.
    pub const LABOURS: &str = "labourList";
    /// Project records.
    pub const PROJECTS: &str = "projectsList";
    /// Material inventory records.
    pub const MATERIALS: &str = "materialList";
    /// Authenticated user profiles.
    pub const USERS: &str = "users";
}

/// An in-process document store keyed by collection name and document id.
///
/// # Example
///
/// ```
/// use buildtrack::store::DocumentStore;
/// use serde_json::json;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = DocumentStore::new();
/// let id = store.add("projectsList", json!({"projectName": "Villa"})).await.unwrap();
/// let doc = store.get("projectsList", &id).await.unwrap().unwrap();
/// assert_eq!(doc["projectName"], "Villa");
/// assert_eq!(doc["id"], id.as_str());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct DocumentStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
}

impl DocumentStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generates a fresh document id.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Fetches a document by id. Returns `Ok(None)` when the document
    /// does not exist.
    pub async fn get(&self, collection: &str, id: &str) -> EngineResult<Option<Value>> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    /// Returns every document in a collection as `(id, document)` pairs.
    pub async fn all(&self, collection: &str) -> EngineResult<Vec<(String, Value)>> {
        let guard = self.collections.read().await;
        let mut docs: Vec<(String, Value)> = guard
            .get(collection)
            .map(|docs| docs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        docs.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(docs)
    }

    /// Returns every document whose `field` equals `value`.
    pub async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> EngineResult<Vec<Value>> {
        let guard = self.collections.read().await;
        let mut matches: Vec<Value> = guard
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| doc.get(field) == Some(value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        matches.sort_by(|a, b| {
            let ka = a.get("id").and_then(Value::as_str).unwrap_or_default();
            let kb = b.get("id").and_then(Value::as_str).unwrap_or_default();
            ka.cmp(kb)
        });
        Ok(matches)
    }

    /// Adds a new document with a generated id and returns the id.
    ///
    /// The generated id is also written into the document's `id` field so
    /// that fetched documents are self-describing.
    pub async fn add(&self, collection: &str, mut doc: Value) -> EngineResult<String> {
        let id = Self::generate_id();
        if let Value::Object(fields) = &mut doc {
            fields.insert("id".to_string(), Value::String(id.clone()));
        } else {
            return Err(EngineError::Storage {
                message: format!("document for '{collection}' must be a JSON object"),
            });
        }
        let mut guard = self.collections.write().await;
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    /// Merges `fields` into the document with the given id, creating the
    /// document when it does not exist. Top-level fields are replaced.
    pub async fn set_merge(&self, collection: &str, id: &str, fields: Value) -> EngineResult<()> {
        let Value::Object(fields) = fields else {
            return Err(EngineError::Storage {
                message: format!("merge payload for '{collection}/{id}' must be a JSON object"),
            });
        };
        let mut guard = self.collections.write().await;
        let doc = guard
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(existing) = doc {
            for (key, value) in fields {
                existing.insert(key, value);
            }
        }
        Ok(())
    }

    /// Merges `fields` into an existing document. Fails with
    /// [`EngineError::Storage`] when the document does not exist; callers
    /// that need a 404 must check existence with [`DocumentStore::get`]
    /// first.
    pub async fn update(&self, collection: &str, id: &str, fields: Value) -> EngineResult<()> {
        let Value::Object(fields) = fields else {
            return Err(EngineError::Storage {
                message: format!("update payload for '{collection}/{id}' must be a JSON object"),
            });
        };
        let mut guard = self.collections.write().await;
        let doc = guard
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| EngineError::Storage {
                message: format!("update on missing document '{collection}/{id}'"),
            })?;
        if let Value::Object(existing) = doc {
            for (key, value) in fields {
                existing.insert(key, value);
            }
        }
        Ok(())
    }

    /// Appends `items` to the array field `field` of an existing document,
    /// skipping elements already present (array-union semantics).
    pub async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        items: Vec<Value>,
    ) -> EngineResult<()> {
        let mut guard = self.collections.write().await;
        let doc = guard
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| EngineError::Storage {
                message: format!("array-union on missing document '{collection}/{id}'"),
            })?;
        let Value::Object(existing) = doc else {
            return Err(EngineError::Storage {
                message: format!("document '{collection}/{id}' is not a JSON object"),
            });
        };
        let array = existing
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(elements) = array else {
            return Err(EngineError::Storage {
                message: format!("field '{field}' of '{collection}/{id}' is not an array"),
            });
        };
        for item in items {
            if !elements.contains(&item) {
                elements.push(item);
            }
        }
        Ok(())
    }
}
