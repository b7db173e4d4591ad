//! Remote document store access.
//!
//! All persistence is delegated to a remote JSON document store addressed
//! through four HTTP verbs. The [`DocumentStore`] trait is the seam between
//! the services and the wire: [`http::HttpStore`] talks to the real store,
//! [`memory::MemoryStore`] backs the tests.

pub mod http;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// The entity collections the store holds.
///
/// Each collection is one path segment under the store's base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// People that can be assigned to tasks.
    Contacts,
    /// Tasks on the board.
    Tasks,
    /// Login accounts.
    Admins,
    /// Category lookup table.
    Categories,
    /// Priority lookup table.
    Priorities,
}

impl Collection {
    /// All collections the application uses.
    pub const ALL: [Collection; 5] = [
        Collection::Contacts,
        Collection::Tasks,
        Collection::Admins,
        Collection::Categories,
        Collection::Priorities,
    ];

    /// The path segment for this collection.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contacts => "contacts",
            Self::Tasks => "tasks",
            Self::Admins => "admins",
            Self::Categories => "categories",
            Self::Priorities => "priorities",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw document operations against one store.
///
/// Documents are JSON values keyed by store-assigned string ids. The trait
/// is value-level; the typed helpers below do serde at the edge. There is
/// no locking and no conflict detection: concurrent writers overwrite each
/// other, last write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Fetch every document in a collection.
    ///
    /// An absent collection reads as empty.
    async fn list(&self, collection: Collection) -> Result<BTreeMap<String, Value>>;

    /// Fetch a single document by id.
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>>;

    /// Store a new document and return its assigned id.
    async fn create(&self, collection: Collection, doc: Value) -> Result<String>;

    /// Overwrite the document at `id`, creating it if absent.
    async fn put(&self, collection: Collection, id: &str, doc: Value) -> Result<()>;

    /// Remove the document at `id`. Returns `false` if it was not there.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool>;
}

/// Fetch a whole collection as typed records.
///
/// # Errors
///
/// Returns an error if the store call fails or a document does not
/// deserialize as `T`.
pub async fn list_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
) -> Result<BTreeMap<String, T>> {
    let raw = store.list(collection).await?;
    let mut typed = BTreeMap::new();
    for (id, value) in raw {
        typed.insert(id, serde_json::from_value(value)?);
    }
    Ok(typed)
}

/// Fetch a single document as a typed record.
///
/// # Errors
///
/// Returns an error if the store call fails or the document does not
/// deserialize as `T`.
pub async fn get_as<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
) -> Result<Option<T>> {
    match store.get(collection, id).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Store a new typed record, returning its assigned id.
///
/// # Errors
///
/// Returns an error if serialization or the store call fails.
pub async fn create_as<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: Collection,
    doc: &T,
) -> Result<String> {
    store.create(collection, serde_json::to_value(doc)?).await
}

/// Overwrite a typed record at `id`.
///
/// # Errors
///
/// Returns an error if serialization or the store call fails.
pub async fn put_as<T: Serialize + Sync>(
    store: &dyn DocumentStore,
    collection: Collection,
    id: &str,
    doc: &T,
) -> Result<()> {
    store
        .put(collection, id, serde_json::to_value(doc)?)
        .await
}
