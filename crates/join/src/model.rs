//! Core entity types for join.
//!
//! This module defines the records stored in the remote document store:
//! tasks with their subtasks, contacts, admin accounts, and the id-keyed
//! category and priority lookup tables.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The Kanban column a task currently occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not started.
    ToDo,
    /// Being worked on.
    InProgress,
    /// Finished, waiting on review.
    AwaitFeedback,
    /// Completed.
    Done,
}

impl Status {
    /// All columns in board order, left to right.
    pub const ALL: [Status; 4] = [
        Status::ToDo,
        Status::InProgress,
        Status::AwaitFeedback,
        Status::Done,
    ];

    /// Human-readable column heading.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::AwaitFeedback => "Await Feedback",
            Self::Done => "Done",
        }
    }

    /// The column one step to the right, saturating at `Done`.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::ToDo => Self::InProgress,
            Self::InProgress => Self::AwaitFeedback,
            Self::AwaitFeedback | Self::Done => Self::Done,
        }
    }

    /// The column one step to the left, saturating at `ToDo`.
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::ToDo | Self::InProgress => Self::ToDo,
            Self::AwaitFeedback => Self::InProgress,
            Self::Done => Self::AwaitFeedback,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToDo => write!(f, "to_do"),
            Self::InProgress => write!(f, "in_progress"),
            Self::AwaitFeedback => write!(f, "await_feedback"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// A checklist line item attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    /// What needs doing.
    pub title: String,
    /// Whether the item has been checked off.
    #[serde(default)]
    pub done: bool,
}

impl Subtask {
    /// Create an unchecked subtask.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            done: false,
        }
    }
}

/// A task on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Short title shown on the board card.
    pub title: String,

    /// Longer free-form description.
    #[serde(default)]
    pub description: String,

    /// Contact ids of the people assigned to this task.
    ///
    /// Ids are not checked against the contacts collection; a deleted
    /// contact leaves a dangling reference here.
    #[serde(default)]
    pub assignees: Vec<String>,

    /// When the task is due.
    pub due_date: NaiveDate,

    /// Id into the priorities lookup table.
    pub priority: String,

    /// Id into the categories lookup table.
    pub category: String,

    /// Ordered checklist of subtasks.
    #[serde(default)]
    pub subtasks: Vec<Subtask>,

    /// The column this task occupies.
    pub status: Status,

    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Count of checked-off subtasks and of all subtasks.
    #[must_use]
    pub fn subtask_progress(&self) -> (usize, usize) {
        let done = self.subtasks.iter().filter(|s| s.done).count();
        (done, self.subtasks.len())
    }

    /// Case-insensitive substring match against title and description.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

/// A person that can be assigned to tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Mobile number, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// Hex badge color, e.g. `#FF7A00`.
    pub color: String,
    /// Uppercase initials derived from the name.
    pub initials: String,
}

impl Contact {
    /// Build a contact, deriving badge color and initials from the name.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>, mobile: Option<String>) -> Self {
        let name = name.into();
        let color = color_for(&name).to_string();
        let initials = initials_for(&name);
        Self {
            name,
            email: email.into(),
            mobile,
            color,
            initials,
        }
    }

    /// Rename the contact, re-deriving the initials. The badge color is kept.
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.initials = initials_for(&self.name);
    }
}

/// Badge colors assignable to contacts.
const CONTACT_COLORS: [&str; 15] = [
    "#FF7A00", "#FF5EB3", "#6E52FF", "#9327FF", "#00BEE8", "#1FD7C1", "#FF745E", "#FFA35E",
    "#FC71FF", "#FFC701", "#0038FF", "#C3FF2B", "#FFE62B", "#FF4646", "#FFBB2B",
];

/// Pick a badge color for the given name.
///
/// The pick is a stable hash of the name into the palette, so the same
/// contact gets the same color on every device.
#[must_use]
pub fn color_for(name: &str) -> &'static str {
    let digest = Sha256::digest(name.as_bytes());
    let index = usize::from(digest[0]) % CONTACT_COLORS.len();
    CONTACT_COLORS[index]
}

/// Derive uppercase initials from a display name.
///
/// Uses the first letter of the first and last words; a single-word name
/// yields a single letter.
#[must_use]
pub fn initials_for(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let mut initials = String::new();
    if let Some(first) = words.first().and_then(|w| w.chars().next()) {
        initials.extend(first.to_uppercase());
    }
    if words.len() > 1 {
        if let Some(last) = words.last().and_then(|w| w.chars().next()) {
            initials.extend(last.to_uppercase());
        }
    }
    initials
}

/// An entry in the categories lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display title.
    pub title: String,
    /// Hex label color.
    pub color: String,
}

/// An entry in the priorities lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    /// Display title.
    pub title: String,
    /// Hex label color.
    pub color: String,
    /// Short glyph shown next to the title.
    pub icon: String,
}

impl Priority {
    /// Id of the seeded urgent priority.
    pub const URGENT_ID: &'static str = "urgent";
    /// Id of the seeded medium priority.
    pub const MEDIUM_ID: &'static str = "medium";
    /// Id of the seeded low priority.
    pub const LOW_ID: &'static str = "low";
}

/// The category table the application ships with.
#[must_use]
pub fn seed_categories() -> BTreeMap<String, Category> {
    let mut categories = BTreeMap::new();
    categories.insert(
        "technical_task".to_string(),
        Category {
            title: "Technical Task".to_string(),
            color: "#1FD7C1".to_string(),
        },
    );
    categories.insert(
        "user_story".to_string(),
        Category {
            title: "User Story".to_string(),
            color: "#0038FF".to_string(),
        },
    );
    categories
}

/// The priority table the application ships with.
#[must_use]
pub fn seed_priorities() -> BTreeMap<String, Priority> {
    let mut priorities = BTreeMap::new();
    priorities.insert(
        Priority::URGENT_ID.to_string(),
        Priority {
            title: "Urgent".to_string(),
            color: "#FF3D00".to_string(),
            icon: "⇈".to_string(),
        },
    );
    priorities.insert(
        Priority::MEDIUM_ID.to_string(),
        Priority {
            title: "Medium".to_string(),
            color: "#FFA800".to_string(),
            icon: "=".to_string(),
        },
    );
    priorities.insert(
        Priority::LOW_ID.to_string(),
        Priority {
            title: "Low".to_string(),
            color: "#7AE229".to_string(),
            icon: "⇊".to_string(),
        },
    );
    priorities
}

/// An account that can log in to the application.
///
/// The password is stored as a client-computed salted SHA-256 hash; the
/// store itself performs no authentication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admin {
    /// Display name.
    pub name: String,
    /// Login email, unique across the admins collection.
    pub email: String,
    /// Salt mixed into the password hash.
    pub salt: String,
    /// Lowercase hex SHA-256 of salt + password.
    pub password_hash: String,
    /// Uppercase initials derived from the name.
    pub initials: String,
}
