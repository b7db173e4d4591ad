//! `join` - Kanban task management against a remote JSON document store
//!
//! This library provides the core functionality for the join CLI: the
//! entity model, the document store client, accounts and sessions, contact
//! and task management, the board, and the summary dashboard.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod auth;
pub mod board;
pub mod cli;
pub mod config;
pub mod contacts;
pub mod error;
pub mod logging;
pub mod model;
pub mod store;
pub mod summary;
pub mod tasks;
pub mod validate;

pub use auth::{Authenticator, Session};
pub use board::{Board, BoardView};
pub use config::Config;
pub use contacts::Directory;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Contact, Status, Task};
pub use store::{Collection, DocumentStore};
pub use summary::Summary;
pub use tasks::TaskService;
