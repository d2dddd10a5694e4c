//! In-memory document store
//!
//! Backs the test suites and local development. Documents live in a
//! `RwLock`-guarded map; write failures can be injected to exercise the
//! best-effort error handling of the layers above.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

use super::{DocumentStore, StoreError};

/// Failure mode injected into subsequent writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteFailure {
    PermissionDenied,
    Unavailable,
}

/// In-memory `DocumentStore` backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, HashMap<String, Value>>>,
    write_failure: RwLock<Option<WriteFailure>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent writes fail with `StoreError::PermissionDenied`.
    pub fn deny_writes(&self) {
        *self.write_failure.write().unwrap_or_else(|e| e.into_inner()) =
            Some(WriteFailure::PermissionDenied);
    }

    /// Make subsequent writes fail with `StoreError::Unavailable`.
    pub fn fail_writes(&self) {
        *self.write_failure.write().unwrap_or_else(|e| e.into_inner()) =
            Some(WriteFailure::Unavailable);
    }

    /// Clear any injected write failure.
    pub fn restore_writes(&self) {
        *self.write_failure.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Number of documents currently in a collection.
    pub fn collection_len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(collection)
            .map(HashMap::len)
            .unwrap_or(0)
    }

    /// Snapshot of a single document, for assertions.
    pub fn document(&self, collection: &str, key: &str) -> Option<Value> {
        self.collections
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        match *self.write_failure.read().unwrap_or_else(|e| e.into_inner()) {
            Some(WriteFailure::PermissionDenied) => Err(StoreError::PermissionDenied),
            Some(WriteFailure::Unavailable) => {
                Err(StoreError::Unavailable("injected write failure".into()))
            }
            None => Ok(()),
        }
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.document(collection, key))
    }

    async fn set(&self, collection: &str, key: &str, document: Value) -> Result<(), StoreError> {
        self.check_writable()?;
        self.collections
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), document);
        Ok(())
    }

    async fn merge(&self, collection: &str, key: &str, fields: Value) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut collections = self.collections.write().unwrap_or_else(|e| e.into_inner());
        let docs = collections.entry(collection.to_string()).or_default();

        let merged = match (docs.remove(key), fields) {
            (Some(Value::Object(mut existing)), Value::Object(incoming)) => {
                for (field, value) in incoming {
                    existing.insert(field, value);
                }
                Value::Object(existing)
            }
            (_, fields) => fields,
        };
        docs.insert(key.to_string(), merged);
        Ok(())
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<(String, Value)>, StoreError> {
        let collections = self.collections.read().unwrap_or_else(|e| e.into_inner());
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, doc)| doc.get(field).and_then(Value::as_str) == Some(value))
            .map(|(key, doc)| (key.clone(), doc.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let store = MemoryStore::new();
        store
            .set("accounts", "u1_BR", json!({"userId": "u1"}))
            .await
            .unwrap();

        let doc = store.get("accounts", "u1_BR").await.unwrap().unwrap();
        assert_eq!(doc["userId"], "u1");
        assert_eq!(store.collection_len("accounts"), 1);
    }

    #[tokio::test]
    async fn merge_upserts_and_preserves_other_fields() {
        let store = MemoryStore::new();

        // Merge on a missing document creates it.
        store
            .merge("pixKeys", "u1_pix_email", json!({"keyValue": "a@x.com"}))
            .await
            .unwrap();

        store
            .merge("pixKeys", "u1_pix_email", json!({"userId": "u1"}))
            .await
            .unwrap();

        let doc = store.get("pixKeys", "u1_pix_email").await.unwrap().unwrap();
        assert_eq!(doc["keyValue"], "a@x.com");
        assert_eq!(doc["userId"], "u1");
    }

    #[tokio::test]
    async fn query_eq_filters_on_top_level_field() {
        let store = MemoryStore::new();
        store
            .set("pixKeys", "k1", json!({"userId": "u1", "keyType": "email"}))
            .await
            .unwrap();
        store
            .set("pixKeys", "k2", json!({"userId": "u2", "keyType": "email"}))
            .await
            .unwrap();

        let results = store.query_eq("pixKeys", "userId", "u1").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "k1");
    }

    #[tokio::test]
    async fn injected_failures_affect_writes_not_reads() {
        let store = MemoryStore::new();
        store.set("accounts", "a", json!({})).await.unwrap();

        store.deny_writes();
        let err = store.set("accounts", "b", json!({})).await.unwrap_err();
        assert!(err.is_permission_denied());
        assert!(store.get("accounts", "a").await.unwrap().is_some());

        store.fail_writes();
        let err = store.merge("accounts", "b", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        store.restore_writes();
        store.set("accounts", "b", json!({})).await.unwrap();
        assert_eq!(store.collection_len("accounts"), 2);
    }
}
