//! Error types for join.
//!
//! This module defines all error types used throughout the join crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for join operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Remote Store Errors ===
    /// An HTTP request to the remote store failed at the transport level.
    #[error("request to collection '{collection}' failed: {source}")]
    StoreRequest {
        /// Collection the request addressed.
        collection: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// The remote store answered with a non-success status code.
    #[error("store returned {status} for collection '{collection}'")]
    StoreStatus {
        /// Collection the request addressed.
        collection: String,
        /// The HTTP status code.
        status: reqwest::StatusCode,
    },

    /// The store returned a payload with an unexpected shape.
    #[error("unexpected payload from collection '{collection}': {message}")]
    StorePayload {
        /// Collection the payload came from.
        collection: String,
        /// Description of what went wrong.
        message: String,
    },

    /// A document was not found where one was required.
    #[error("no document '{id}' in collection '{collection}'")]
    NotFound {
        /// Collection that was searched.
        collection: String,
        /// Id of the missing document.
        id: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Validation Errors ===
    /// A user-supplied field failed validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// Description of the validation failure.
        message: String,
    },

    /// A subtask index was out of range for the task's checklist.
    #[error("subtask index {index} out of range (task has {len} subtasks)")]
    SubtaskIndex {
        /// The requested index.
        index: usize,
        /// Number of subtasks the task actually has.
        len: usize,
    },

    // === Auth Errors ===
    /// Email or password did not match a stored account.
    #[error("email or password did not match")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("an account with email '{email}' already exists")]
    EmailTaken {
        /// The email that is already registered.
        email: String,
    },

    /// No session file is present.
    #[error("not logged in; run 'join auth login' or 'join auth guest' first")]
    NotLoggedIn,

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for join operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new input validation error.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a not-found error for a collection/id pair.
    #[must_use]
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Create a payload-shape error for a collection.
    #[must_use]
    pub fn store_payload(collection: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorePayload {
            collection: collection.into(),
            message: message.into(),
        }
    }

    /// Check if this error means a document was missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error is a credential mismatch.
    #[must_use]
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Self::InvalidCredentials)
    }

    /// Check if this error came from user input rather than the system.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::SubtaskIndex { .. })
    }
}
