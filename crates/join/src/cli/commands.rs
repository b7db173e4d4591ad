//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::model::Status;

/// Account and session commands.
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Register a new account
    Signup {
        /// Display name
        name: String,

        /// Login email
        email: String,

        /// Password (hashed client-side before it is stored)
        #[arg(short, long)]
        password: String,
    },

    /// Log in and open a session
    Login {
        /// Login email
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },

    /// Open an anonymous guest session
    Guest,

    /// Close the current session
    Logout,

    /// Show who is logged in
    Whoami {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Contact directory commands.
#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// Add a contact
    Add {
        /// Display name
        name: String,

        /// Email address
        email: String,

        /// Mobile number
        #[arg(short, long)]
        mobile: Option<String>,
    },

    /// List contacts
    List {
        /// Group contacts under their first letter
        #[arg(short, long)]
        grouped: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one contact
    Show {
        /// Contact id
        id: String,
    },

    /// Edit a contact
    Edit {
        /// Contact id
        id: String,

        /// New display name
        #[arg(long)]
        name: Option<String>,

        /// New email address
        #[arg(long)]
        email: Option<String>,

        /// New mobile number
        #[arg(long)]
        mobile: Option<String>,
    },

    /// Remove a contact
    ///
    /// Tasks assigned to the contact keep the dangling id.
    Remove {
        /// Contact id
        id: String,
    },
}

/// Task commands.
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Add a task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Due date (yyyy-mm-dd or dd/mm/yyyy)
        #[arg(long)]
        due: String,

        /// Priority id
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Category id
        #[arg(long)]
        category: String,

        /// Contact id to assign (repeatable)
        #[arg(short, long = "assignee")]
        assignees: Vec<String>,

        /// Column to start in
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,
    },

    /// List tasks
    List {
        /// Only tasks in this column
        #[arg(short, long, value_enum)]
        status: Option<StatusArg>,

        /// Only tasks assigned to this contact id
        #[arg(short, long)]
        assignee: Option<String>,

        /// Only tasks whose title or description contains this term
        #[arg(long)]
        search: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one task with its checklist
    Show {
        /// Task id
        id: String,
    },

    /// Edit a task
    Edit {
        /// Task id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New due date (yyyy-mm-dd or dd/mm/yyyy)
        #[arg(long)]
        due: Option<String>,

        /// New priority id
        #[arg(long)]
        priority: Option<String>,

        /// New category id
        #[arg(long)]
        category: Option<String>,

        /// Replacement assignee list (repeatable; empty to clear)
        #[arg(long = "assignee")]
        assignees: Option<Vec<String>>,
    },

    /// Remove a task
    Remove {
        /// Task id
        id: String,
    },

    /// Manage a task's checklist
    #[command(subcommand)]
    Subtask(SubtaskCommand),
}

/// Checklist commands.
#[derive(Debug, Subcommand)]
pub enum SubtaskCommand {
    /// Append a checklist item
    Add {
        /// Task id
        task: String,

        /// Item title
        title: String,
    },

    /// Check an item off
    Done {
        /// Task id
        task: String,

        /// Item position, starting at 0
        index: usize,
    },

    /// Uncheck an item
    Undone {
        /// Task id
        task: String,

        /// Item position, starting at 0
        index: usize,
    },

    /// Remove an item
    Remove {
        /// Task id
        task: String,

        /// Item position, starting at 0
        index: usize,
    },
}

/// Board commands.
#[derive(Debug, Subcommand)]
pub enum BoardCommand {
    /// Show the board, one column per status
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Move a task to a column
    Move {
        /// Task id
        task: String,

        /// Target column
        #[arg(value_enum)]
        column: StatusArg,
    },

    /// Move a task one column right
    Advance {
        /// Task id
        task: String,
    },

    /// Move a task one column left
    Retreat {
        /// Task id
        task: String,
    },
}

/// Summary command arguments.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Status argument for column selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    /// The To Do column
    ToDo,
    /// The In Progress column
    InProgress,
    /// The Await Feedback column
    AwaitFeedback,
    /// The Done column
    Done,
}

impl From<StatusArg> for Status {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::ToDo => Self::ToDo,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::AwaitFeedback => Self::AwaitFeedback,
            StatusArg::Done => Self::Done,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
