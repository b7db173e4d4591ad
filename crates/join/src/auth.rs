//! Accounts and login sessions.
//!
//! Credentials use the scheme the store was populated with: the client
//! computes a salted SHA-256 over the password and compares against the
//! stored hash. The store itself trusts the client completely; this is
//! account bookkeeping, not a security boundary.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{initials_for, Admin};
use crate::store::{create_as, list_as, Collection, DocumentStore};
use crate::validate::Validator;

/// A login session, persisted to the session file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Id of the admin record, absent for guest sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Uppercase initials for the profile badge.
    pub initials: String,
    /// Whether this is an anonymous guest session.
    #[serde(default)]
    pub guest: bool,
    /// When the session was opened.
    pub logged_in_at: DateTime<Utc>,
}

/// Compute the lowercase hex SHA-256 of salt + password.
#[must_use]
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Account signup, login, and session file handling.
#[derive(Debug)]
pub struct Authenticator<'a> {
    store: &'a dyn DocumentStore,
    session_path: PathBuf,
    validator: Validator,
}

impl<'a> Authenticator<'a> {
    /// Build an authenticator against the given store.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured validation patterns do not compile.
    pub fn new(store: &'a dyn DocumentStore, config: &Config) -> Result<Self> {
        Ok(Self {
            store,
            session_path: config.session_path(),
            validator: Validator::new(&config.validation)?,
        })
    }

    /// Register a new admin account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name or malformed email, and
    /// [`Error::EmailTaken`] if the email is already registered.
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<(String, Admin)> {
        self.validator.name(name)?;
        self.validator.email(email)?;
        if password.is_empty() {
            return Err(Error::validation("password", "must not be empty"));
        }

        let admins = list_as::<Admin>(self.store, Collection::Admins).await?;
        if admins
            .values()
            .any(|admin| admin.email.eq_ignore_ascii_case(email))
        {
            return Err(Error::EmailTaken {
                email: email.to_string(),
            });
        }

        let salt = Uuid::new_v4().simple().to_string();
        let admin = Admin {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password, &salt),
            salt,
            initials: initials_for(name),
        };

        let id = create_as(self.store, Collection::Admins, &admin).await?;
        info!("registered admin '{email}' as {id}");
        Ok((id, admin))
    }

    /// Log in with email and password, writing the session file on success.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCredentials`] whether the email is unknown or
    /// the password is wrong; callers cannot tell the two apart.
    pub async fn log_in(&self, email: &str, password: &str) -> Result<Session> {
        let admins = list_as::<Admin>(self.store, Collection::Admins).await?;

        let (id, admin) = admins
            .iter()
            .find(|(_, admin)| admin.email.eq_ignore_ascii_case(email))
            .ok_or(Error::InvalidCredentials)?;

        if hash_password(password, &admin.salt) != admin.password_hash {
            return Err(Error::InvalidCredentials);
        }

        let session = Session {
            admin_id: Some(id.clone()),
            name: admin.name.clone(),
            initials: admin.initials.clone(),
            guest: false,
            logged_in_at: Utc::now(),
        };
        self.write_session(&session)?;
        info!("logged in as '{}'", admin.email);
        Ok(session)
    }

    /// Open an anonymous guest session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be written.
    pub fn guest(&self) -> Result<Session> {
        let session = Session {
            admin_id: None,
            name: "Guest".to_string(),
            initials: "G".to_string(),
            guest: true,
            logged_in_at: Utc::now(),
        };
        self.write_session(&session)?;
        info!("opened guest session");
        Ok(session)
    }

    /// Close the current session. Returns `false` if none was open.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be removed.
    pub fn log_out(&self) -> Result<bool> {
        if self.session_path.exists() {
            std::fs::remove_file(&self.session_path)?;
            info!("logged out");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Read the current session, if one is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file exists but cannot be read or
    /// parsed.
    pub fn current(&self) -> Result<Option<Session>> {
        if !self.session_path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.session_path)?;
        let session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    /// Read the current session, erroring when none is open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] when no session file exists.
    pub fn require_session(&self) -> Result<Session> {
        self.current()?.ok_or(Error::NotLoggedIn)
    }

    fn write_session(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.session_path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        debug!("writing session to {}", self.session_path.display());
        std::fs::write(&self.session_path, serde_json::to_string_pretty(session)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn test_config(dir: &tempfile::TempDir) -> Config {
        let mut config = Config::default();
        config.session.session_path = Some(dir.path().join("session.json"));
        config
    }

    #[test]
    fn test_hash_password_is_deterministic() {
        assert_eq!(hash_password("secret", "salt"), hash_password("secret", "salt"));
    }

    #[test]
    fn test_hash_password_depends_on_salt() {
        assert_ne!(hash_password("secret", "a"), hash_password("secret", "b"));
    }

    #[test]
    fn test_hash_password_known_value() {
        // sha256("pepper" + "hunter2")
        assert_eq!(
            hash_password("hunter2", "pepper"),
            "ca458f67a1e64e60f40414c062c57abbfc1d41b5d0c30cd07d12704540067f21"
        );
    }

    #[tokio::test]
    async fn test_sign_up_and_log_in() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let config = test_config(&dir);
        let auth = Authenticator::new(&store, &config).unwrap();

        let (id, admin) = auth
            .sign_up("Ada Admin", "ada@example.com", "secret")
            .await
            .unwrap();
        assert_eq!(admin.initials, "AA");
        assert_ne!(admin.password_hash, "secret");
        assert!(!id.is_empty());

        let session = auth.log_in("ada@example.com", "secret").await.unwrap();
        assert_eq!(session.admin_id, Some(id));
        assert_eq!(session.name, "Ada Admin");
        assert!(!session.guest);

        let current = auth.current().unwrap().unwrap();
        assert_eq!(current, session);
    }

    #[tokio::test]
    async fn test_sign_up_rejects_taken_email() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let config = test_config(&dir);
        let auth = Authenticator::new(&store, &config).unwrap();

        auth.sign_up("Ada", "ada@example.com", "secret")
            .await
            .unwrap();
        let result = auth.sign_up("Other Ada", "ADA@example.com", "other").await;
        assert!(matches!(result, Err(Error::EmailTaken { .. })));
    }

    #[tokio::test]
    async fn test_sign_up_validates_input() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let config = test_config(&dir);
        let auth = Authenticator::new(&store, &config).unwrap();

        assert!(auth.sign_up("", "ada@example.com", "pw").await.is_err());
        assert!(auth.sign_up("Ada", "not-an-email", "pw").await.is_err());
        assert!(auth.sign_up("Ada", "ada@example.com", "").await.is_err());
    }

    #[tokio::test]
    async fn test_log_in_wrong_password() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let config = test_config(&dir);
        let auth = Authenticator::new(&store, &config).unwrap();

        auth.sign_up("Ada", "ada@example.com", "secret")
            .await
            .unwrap();
        let result = auth.log_in("ada@example.com", "wrong").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_log_in_unknown_email_same_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let config = test_config(&dir);
        let auth = Authenticator::new(&store, &config).unwrap();

        let result = auth.log_in("nobody@example.com", "pw").await;
        assert!(matches!(result, Err(Error::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_guest_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let config = test_config(&dir);
        let auth = Authenticator::new(&store, &config).unwrap();

        let session = auth.guest().unwrap();
        assert!(session.guest);
        assert!(session.admin_id.is_none());
        assert_eq!(session.initials, "G");

        let current = auth.current().unwrap().unwrap();
        assert_eq!(current.name, "Guest");
    }

    #[tokio::test]
    async fn test_log_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let config = test_config(&dir);
        let auth = Authenticator::new(&store, &config).unwrap();

        assert!(!auth.log_out().unwrap());

        auth.guest().unwrap();
        assert!(auth.log_out().unwrap());
        assert!(auth.current().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_require_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let config = test_config(&dir);
        let auth = Authenticator::new(&store, &config).unwrap();

        assert!(matches!(auth.require_session(), Err(Error::NotLoggedIn)));
        auth.guest().unwrap();
        assert!(auth.require_session().is_ok());
    }
}
