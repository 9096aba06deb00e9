use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::core::time::{format_timestamp, now_utc};

use super::{Direction, DocumentStore, Filter, OrderBy, StoreError, StoredDocument, CREATED_AT, UPDATED_AT};

/// In-memory document store. Used by hosting-shell tests and offline work;
/// behaves like the remote backend, including server-stamped timestamps.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: Mutex<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection, deleted included.
    pub fn len(&self, collection: &str) -> usize {
        let collections = self.collections.lock().unwrap_or_else(|err| err.into_inner());
        collections.get(collection).map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

fn matches(document: &StoredDocument, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| document.data.get(&filter.field) == Some(&filter.value))
}

fn compare_values(left: &Value, right: &Value) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match (left, right) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}

fn stamp(data: &mut Value, field: &str, timestamp: &str) {
    if let Value::Object(map) = data {
        map.insert(field.to_string(), Value::String(timestamp.to_string()));
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let collections = self.collections.lock().unwrap_or_else(|err| err.into_inner());
        let mut results: Vec<StoredDocument> = collections
            .get(collection)
            .map(|documents| {
                documents.iter().filter(|document| matches(document, filters)).cloned().collect()
            })
            .unwrap_or_default();

        if let Some(order) = order_by {
            results.sort_by(|a, b| {
                let ordering = compare_values(
                    a.data.get(&order.field).unwrap_or(&Value::Null),
                    b.data.get(&order.field).unwrap_or(&Value::Null),
                );
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        Ok(results)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let collections = self.collections.lock().unwrap_or_else(|err| err.into_inner());
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.iter().find(|document| document.id == id))
            .cloned())
    }

    async fn add(&self, collection: &str, mut data: Value) -> Result<String, StoreError> {
        if !data.is_object() {
            return Err(StoreError::MalformedResponse(
                "only JSON objects can be stored".to_string(),
            ));
        }

        let timestamp = format_timestamp(now_utc());
        stamp(&mut data, CREATED_AT, &timestamp);
        stamp(&mut data, UPDATED_AT, &timestamp);

        let id = Uuid::new_v4().to_string();
        let mut collections = self.collections.lock().unwrap_or_else(|err| err.into_inner());
        collections
            .entry(collection.to_string())
            .or_default()
            .push(StoredDocument { id: id.clone(), data });
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::MalformedResponse(
                "only JSON objects can be stored".to_string(),
            ));
        };

        let mut collections = self.collections.lock().unwrap_or_else(|err| err.into_inner());
        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|document| document.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        if let Value::Object(data) = &mut document.data {
            for (key, value) in patch {
                data.insert(key, value);
            }
            data.insert(UPDATED_AT.to_string(), Value::String(format_timestamp(now_utc())));
        }

        Ok(())
    }
}
