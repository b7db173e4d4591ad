//! The contact directory.
//!
//! CRUD over the `contacts` collection. Contacts are referenced from tasks
//! by id only; removing a contact does not touch tasks, so assignee lists
//! may hold dangling ids afterwards.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::Contact;
use crate::store::{create_as, get_as, list_as, put_as, Collection, DocumentStore};
use crate::validate::Validator;

/// A partial update to a contact.
#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    /// New display name; initials are re-derived, the badge color is kept.
    pub name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New mobile number.
    pub mobile: Option<String>,
}

impl ContactUpdate {
    /// Whether the update changes anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.mobile.is_none()
    }
}

/// Contact operations against the remote store.
#[derive(Debug)]
pub struct Directory<'a> {
    store: &'a dyn DocumentStore,
    validator: Validator,
}

impl<'a> Directory<'a> {
    /// Build a directory against the given store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured validation patterns do not compile.
    pub fn new(store: &'a dyn DocumentStore, config: &Config) -> Result<Self> {
        Ok(Self {
            store,
            validator: Validator::new(&config.validation)?,
        })
    }

    /// Create a contact, deriving its badge color and initials.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, malformed email, or
    /// malformed mobile number.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        mobile: Option<String>,
    ) -> Result<(String, Contact)> {
        self.validator.name(name)?;
        self.validator.email(email)?;
        if let Some(mobile) = &mobile {
            self.validator.mobile(mobile)?;
        }

        let contact = Contact::new(name, email, mobile);
        let id = create_as(self.store, Collection::Contacts, &contact).await?;
        info!("created contact '{}' as {id}", contact.name);
        Ok((id, contact))
    }

    /// Apply a partial update to a contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and validation errors
    /// for malformed fields.
    pub async fn update(&self, id: &str, update: ContactUpdate) -> Result<Contact> {
        let mut contact = self.get(id).await?;

        if let Some(name) = update.name {
            self.validator.name(&name)?;
            contact.rename(name);
        }
        if let Some(email) = update.email {
            self.validator.email(&email)?;
            contact.email = email;
        }
        if let Some(mobile) = update.mobile {
            self.validator.mobile(&mobile)?;
            contact.mobile = Some(mobile);
        }

        put_as(self.store, Collection::Contacts, id, &contact).await?;
        info!("updated contact {id}");
        Ok(contact)
    }

    /// Remove a contact. Returns `false` if it was not there.
    ///
    /// Tasks that reference the contact keep their assignee id; the board
    /// simply stops resolving it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store call fails.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let removed = self.store.delete(Collection::Contacts, id).await?;
        if removed {
            info!("removed contact {id}");
        }
        Ok(removed)
    }

    /// Fetch a single contact.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub async fn get(&self, id: &str) -> Result<Contact> {
        get_as(self.store, Collection::Contacts, id)
            .await?
            .ok_or_else(|| Error::not_found(Collection::Contacts.as_str(), id))
    }

    /// All contacts, sorted by display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store call fails.
    pub async fn list(&self) -> Result<Vec<(String, Contact)>> {
        let mut contacts: Vec<(String, Contact)> =
            list_as::<Contact>(self.store, Collection::Contacts)
                .await?
                .into_iter()
                .collect();
        contacts.sort_by(|(_, a), (_, b)| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(contacts)
    }

    /// Contacts grouped under their uppercase first letter, A to Z.
    ///
    /// # Errors
    ///
    /// Returns an error if the store call fails.
    pub async fn grouped(&self) -> Result<BTreeMap<char, Vec<(String, Contact)>>> {
        let mut groups: BTreeMap<char, Vec<(String, Contact)>> = BTreeMap::new();
        for (id, contact) in self.list().await? {
            let letter = contact
                .name
                .chars()
                .next()
                .map_or('#', |c| c.to_uppercase().next().unwrap_or('#'));
            groups.entry(letter).or_default().push((id, contact));
        }
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn directory(store: &MemoryStore) -> Directory<'_> {
        Directory::new(store, &Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_create_contact() {
        let store = MemoryStore::new();
        let directory = directory(&store);

        let (id, contact) = directory
            .create("Tatjana Wolf", "wolf@example.com", Some("+49 170 1234567".to_string()))
            .await
            .unwrap();

        assert!(!id.is_empty());
        assert_eq!(contact.initials, "TW");
        assert!(contact.color.starts_with('#'));
        assert_eq!(store.len(Collection::Contacts), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let store = MemoryStore::new();
        let directory = directory(&store);

        assert!(directory.create("", "a@b.cd", None).await.is_err());
        assert!(directory.create("Ada", "broken", None).await.is_err());
        assert!(directory
            .create("Ada", "a@b.cd", Some("nope".to_string()))
            .await
            .is_err());
        assert!(store.is_empty(Collection::Contacts));
    }

    #[tokio::test]
    async fn test_update_contact_rename_keeps_color() {
        let store = MemoryStore::new();
        let directory = directory(&store);

        let (id, created) = directory
            .create("Anja Schulz", "anja@example.com", None)
            .await
            .unwrap();

        let updated = directory
            .update(
                &id,
                ContactUpdate {
                    name: Some("Anja Becker".to_string()),
                    ..ContactUpdate::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Anja Becker");
        assert_eq!(updated.initials, "AB");
        assert_eq!(updated.color, created.color);

        let fetched = directory.get(&id).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_update_unknown_contact() {
        let store = MemoryStore::new();
        let directory = directory(&store);

        let result = directory.update("missing", ContactUpdate::default()).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_contact() {
        let store = MemoryStore::new();
        let directory = directory(&store);

        let (id, _) = directory
            .create("Ada", "ada@example.com", None)
            .await
            .unwrap();

        assert!(directory.remove(&id).await.unwrap());
        assert!(!directory.remove(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_is_sorted_by_name() {
        let store = MemoryStore::new();
        let directory = directory(&store);

        directory
            .create("benedikt ziegler", "bz@example.com", None)
            .await
            .unwrap();
        directory
            .create("Anton Mayer", "am@example.com", None)
            .await
            .unwrap();
        directory
            .create("David Eisenberg", "de@example.com", None)
            .await
            .unwrap();

        let names: Vec<String> = directory
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|(_, c)| c.name)
            .collect();
        assert_eq!(names, ["Anton Mayer", "benedikt ziegler", "David Eisenberg"]);
    }

    #[tokio::test]
    async fn test_grouped_by_first_letter() {
        let store = MemoryStore::new();
        let directory = directory(&store);

        directory
            .create("Anton Mayer", "am@example.com", None)
            .await
            .unwrap();
        directory
            .create("Anja Schulz", "as@example.com", None)
            .await
            .unwrap();
        directory
            .create("Tatjana Wolf", "tw@example.com", None)
            .await
            .unwrap();

        let groups = directory.grouped().await.unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&'A'].len(), 2);
        assert_eq!(groups[&'T'].len(), 1);
    }

    #[test]
    fn test_contact_update_is_empty() {
        assert!(ContactUpdate::default().is_empty());
        assert!(!ContactUpdate {
            email: Some("a@b.cd".to_string()),
            ..ContactUpdate::default()
        }
        .is_empty());
    }
}
