//! HTTP implementation of the document store.
//!
//! Talks to a Firebase-style JSON document store: collections live at
//! `{base}/{collection}.json`, documents at `{base}/{collection}/{id}.json`,
//! and POSTing to a collection returns `{"name": "<assigned id>"}`.
//!
//! Requests carry no authentication header and are never retried; failures
//! surface to the caller once.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{Collection, DocumentStore};
use crate::error::{Error, Result};

/// The store's response to a POST.
#[derive(Debug, Deserialize)]
struct CreatedResponse {
    name: String,
}

/// Remote store client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    /// Create a client for the store at `base_url`.
    ///
    /// A trailing slash on the base URL is tolerated.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// The base URL this client addresses.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}.json", self.base_url, collection)
    }

    fn document_url(&self, collection: Collection, id: &str) -> String {
        format!("{}/{}/{}.json", self.base_url, collection, id)
    }

    fn request_error(collection: Collection, source: reqwest::Error) -> Error {
        Error::StoreRequest {
            collection: collection.to_string(),
            source,
        }
    }

    fn check_status(collection: Collection, response: &reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::StoreStatus {
                collection: collection.to_string(),
                status,
            })
        }
    }
}

#[async_trait]
impl DocumentStore for HttpStore {
    async fn list(&self, collection: Collection) -> Result<BTreeMap<String, Value>> {
        let url = self.collection_url(collection);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| Self::request_error(collection, source))?;
        Self::check_status(collection, &response)?;

        let body: Value = response
            .json()
            .await
            .map_err(|source| Self::request_error(collection, source))?;

        match body {
            // An empty collection reads back as JSON null.
            Value::Null => Ok(BTreeMap::new()),
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(Error::store_payload(
                collection.to_string(),
                format!("expected an object or null, got {other}"),
            )),
        }
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let url = self.document_url(collection, id);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| Self::request_error(collection, source))?;
        Self::check_status(collection, &response)?;

        let body: Value = response
            .json()
            .await
            .map_err(|source| Self::request_error(collection, source))?;

        // A missing document reads back as JSON null.
        if body.is_null() {
            Ok(None)
        } else {
            Ok(Some(body))
        }
    }

    async fn create(&self, collection: Collection, doc: Value) -> Result<String> {
        let url = self.collection_url(collection);
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(&doc)
            .send()
            .await
            .map_err(|source| Self::request_error(collection, source))?;
        Self::check_status(collection, &response)?;

        let created: CreatedResponse = response
            .json()
            .await
            .map_err(|source| Self::request_error(collection, source))?;

        info!("created document {} in '{collection}'", created.name);
        Ok(created.name)
    }

    async fn put(&self, collection: Collection, id: &str, doc: Value) -> Result<()> {
        let url = self.document_url(collection, id);
        debug!("PUT {url}");

        let response = self
            .client
            .put(&url)
            .json(&doc)
            .send()
            .await
            .map_err(|source| Self::request_error(collection, source))?;
        Self::check_status(collection, &response)?;

        info!("updated document {id} in '{collection}'");
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        // The store answers DELETE with 200/null whether or not the document
        // existed, so existence is checked first.
        if self.get(collection, id).await?.is_none() {
            return Ok(false);
        }

        let url = self.document_url(collection, id);
        debug!("DELETE {url}");

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|source| Self::request_error(collection, source))?;
        Self::check_status(collection, &response)?;

        info!("deleted document {id} from '{collection}'");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_url() {
        let store = HttpStore::new("http://localhost:8080");
        assert_eq!(
            store.collection_url(Collection::Tasks),
            "http://localhost:8080/tasks.json"
        );
    }

    #[test]
    fn test_document_url() {
        let store = HttpStore::new("http://localhost:8080");
        assert_eq!(
            store.document_url(Collection::Contacts, "c1"),
            "http://localhost:8080/contacts/c1.json"
        );
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let store = HttpStore::new("https://store.example.com/join/");
        assert_eq!(store.base_url(), "https://store.example.com/join");
        assert_eq!(
            store.collection_url(Collection::Admins),
            "https://store.example.com/join/admins.json"
        );
    }

    #[test]
    fn test_created_response_parses() {
        let created: CreatedResponse = serde_json::from_str(r#"{"name": "-Nxyz123"}"#).unwrap();
        assert_eq!(created.name, "-Nxyz123");
    }
}
