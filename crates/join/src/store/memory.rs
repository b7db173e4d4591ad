//! In-memory implementation of the document store.
//!
//! Backs the test suites; no bytes leave the process. Ids are minted as
//! UUIDs where the real store would assign push ids.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{Collection, DocumentStore};
use crate::error::{Error, Result};

/// Document store held entirely in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently in a collection.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .lock()
            .unwrap()
            .get(&collection)
            .map_or(0, |docs| docs.len())
    }

    /// Whether a collection has no documents.
    #[must_use]
    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Collection, BTreeMap<String, Value>>>> {
        self.collections
            .lock()
            .map_err(|_| Error::internal("memory store lock poisoned"))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&self, collection: Collection) -> Result<BTreeMap<String, Value>> {
        let collections = self.lock()?;
        Ok(collections.get(&collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let collections = self.lock()?;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn create(&self, collection: Collection, doc: Value) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut collections = self.lock()?;
        collections
            .entry(collection)
            .or_default()
            .insert(id.clone(), doc);
        Ok(id)
    }

    async fn put(&self, collection: Collection, id: &str, doc: Value) -> Result<()> {
        let mut collections = self.lock()?;
        collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), doc);
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let mut collections = self.lock()?;
        Ok(collections
            .get_mut(&collection)
            .is_some_and(|docs| docs.remove(id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = MemoryStore::new();
        for collection in Collection::ALL {
            assert!(store.is_empty(collection));
            assert!(store.list(collection).await.unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let store = MemoryStore::new();
        let a = store
            .create(Collection::Tasks, json!({"title": "a"}))
            .await
            .unwrap();
        let b = store
            .create(Collection::Tasks, json!({"title": "b"}))
            .await
            .unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(Collection::Tasks), 2);
    }

    #[tokio::test]
    async fn test_get_round_trip() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Contacts, json!({"name": "Ada"}))
            .await
            .unwrap();

        let doc = store.get(Collection::Contacts, &id).await.unwrap();
        assert_eq!(doc, Some(json!({"name": "Ada"})));

        let missing = store.get(Collection::Contacts, "nope").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Tasks, json!({"title": "before"}))
            .await
            .unwrap();

        store
            .put(Collection::Tasks, &id, json!({"title": "after"}))
            .await
            .unwrap();

        let doc = store.get(Collection::Tasks, &id).await.unwrap().unwrap();
        assert_eq!(doc["title"], "after");
        assert_eq!(store.len(Collection::Tasks), 1);
    }

    #[tokio::test]
    async fn test_put_upserts_unknown_id() {
        let store = MemoryStore::new();
        store
            .put(Collection::Categories, "custom", json!({"title": "Custom"}))
            .await
            .unwrap();
        assert_eq!(store.len(Collection::Categories), 1);
    }

    #[tokio::test]
    async fn test_delete_reports_presence() {
        let store = MemoryStore::new();
        let id = store
            .create(Collection::Admins, json!({"email": "a@b.cd"}))
            .await
            .unwrap();

        assert!(store.delete(Collection::Admins, &id).await.unwrap());
        assert!(!store.delete(Collection::Admins, &id).await.unwrap());
        assert!(store.is_empty(Collection::Admins));
    }

    #[tokio::test]
    async fn test_collections_are_independent() {
        let store = MemoryStore::new();
        store
            .create(Collection::Tasks, json!({"title": "t"}))
            .await
            .unwrap();

        assert!(store.is_empty(Collection::Contacts));
        assert_eq!(store.len(Collection::Tasks), 1);
    }
}
