//! Task CRUD and subtask handling.
//!
//! Operations over the `tasks` collection. Priority and category ids are
//! checked against their lookup tables on write; assignee ids are taken as
//! given, matching the store's total lack of referential integrity.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Category, Priority, Status, Subtask, Task};
use crate::store::{create_as, get_as, list_as, put_as, Collection, DocumentStore};
use crate::validate::parse_due_date;

/// Input for creating a task.
#[derive(Debug, Clone)]
pub struct TaskDraft {
    /// Short title shown on the board card.
    pub title: String,
    /// Longer free-form description.
    pub description: String,
    /// Contact ids to assign.
    pub assignees: Vec<String>,
    /// Due date in `yyyy-mm-dd` or `dd/mm/yyyy` form.
    pub due_date: String,
    /// Priority id.
    pub priority: String,
    /// Category id.
    pub category: String,
    /// Column to start in; defaults to the configured initial column.
    pub status: Option<Status>,
}

/// A partial update to a task.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement assignee list.
    pub assignees: Option<Vec<String>>,
    /// New due date, in either accepted form.
    pub due_date: Option<String>,
    /// New priority id.
    pub priority: Option<String>,
    /// New category id.
    pub category: Option<String>,
}

/// Task operations against the remote store.
#[derive(Debug)]
pub struct TaskService<'a> {
    store: &'a dyn DocumentStore,
    initial_status: Status,
}

impl<'a> TaskService<'a> {
    /// Build a task service against the given store.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, config: &Config) -> Self {
        Self {
            store,
            initial_status: config.board.initial_status,
        }
    }

    /// Create a task from a draft.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank title, an unparseable due
    /// date, or an unknown priority/category id.
    pub async fn create(&self, draft: TaskDraft) -> Result<(String, Task)> {
        if draft.title.trim().is_empty() {
            return Err(Error::validation("title", "must not be empty"));
        }
        let due_date = parse_due_date(&draft.due_date)?;
        self.check_priority(&draft.priority).await?;
        self.check_category(&draft.category).await?;
        if !draft.assignees.is_empty() {
            // Assignee ids are stored as-is; the original never checks them.
            debug!("assigning contacts {:?} unchecked", draft.assignees);
        }

        let task = Task {
            title: draft.title,
            description: draft.description,
            assignees: draft.assignees,
            due_date,
            priority: draft.priority,
            category: draft.category,
            subtasks: Vec::new(),
            status: draft.status.unwrap_or(self.initial_status),
            created_at: Utc::now(),
        };

        let id = create_as(self.store, Collection::Tasks, &task).await?;
        info!("created task '{}' as {id}", task.title);
        Ok((id, task))
    }

    /// Apply a partial update to a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id and validation errors
    /// for malformed fields.
    pub async fn update(&self, id: &str, update: TaskUpdate) -> Result<Task> {
        let mut task = self.get(id).await?;

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(Error::validation("title", "must not be empty"));
            }
            task.title = title;
        }
        if let Some(description) = update.description {
            task.description = description;
        }
        if let Some(assignees) = update.assignees {
            task.assignees = assignees;
        }
        if let Some(due_date) = update.due_date {
            task.due_date = parse_due_date(&due_date)?;
        }
        if let Some(priority) = update.priority {
            self.check_priority(&priority).await?;
            task.priority = priority;
        }
        if let Some(category) = update.category {
            self.check_category(&category).await?;
            task.category = category;
        }

        put_as(self.store, Collection::Tasks, id, &task).await?;
        info!("updated task {id}");
        Ok(task)
    }

    /// Remove a task. Returns `false` if it was not there.
    ///
    /// # Errors
    ///
    /// Returns an error if the store call fails.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let removed = self.store.delete(Collection::Tasks, id).await?;
        if removed {
            info!("removed task {id}");
        }
        Ok(removed)
    }

    /// Fetch a single task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id.
    pub async fn get(&self, id: &str) -> Result<Task> {
        get_as(self.store, Collection::Tasks, id)
            .await?
            .ok_or_else(|| Error::not_found(Collection::Tasks.as_str(), id))
    }

    /// All tasks, keyed by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store call fails.
    pub async fn list(&self) -> Result<BTreeMap<String, Task>> {
        list_as::<Task>(self.store, Collection::Tasks).await
    }

    /// Tasks whose title or description contains `term`, case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns an error if the store call fails.
    pub async fn search(&self, term: &str) -> Result<Vec<(String, Task)>> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|(_, task)| task.matches(term))
            .collect())
    }

    /// Append an unchecked subtask to a task's checklist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown id or a validation error
    /// for a blank title.
    pub async fn add_subtask(&self, id: &str, title: &str) -> Result<Task> {
        if title.trim().is_empty() {
            return Err(Error::validation("subtask", "must not be empty"));
        }
        let mut task = self.get(id).await?;
        task.subtasks.push(Subtask::new(title));
        put_as(self.store, Collection::Tasks, id, &task).await?;
        info!("added subtask to task {id}");
        Ok(task)
    }

    /// Check or uncheck a subtask by its position in the checklist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SubtaskIndex`] for an out-of-range index.
    pub async fn set_subtask_done(&self, id: &str, index: usize, done: bool) -> Result<Task> {
        let mut task = self.get(id).await?;
        let len = task.subtasks.len();
        let subtask = task
            .subtasks
            .get_mut(index)
            .ok_or(Error::SubtaskIndex { index, len })?;
        subtask.done = done;
        put_as(self.store, Collection::Tasks, id, &task).await?;
        Ok(task)
    }

    /// Remove a subtask by its position in the checklist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SubtaskIndex`] for an out-of-range index.
    pub async fn remove_subtask(&self, id: &str, index: usize) -> Result<Task> {
        let mut task = self.get(id).await?;
        if index >= task.subtasks.len() {
            return Err(Error::SubtaskIndex {
                index,
                len: task.subtasks.len(),
            });
        }
        task.subtasks.remove(index);
        put_as(self.store, Collection::Tasks, id, &task).await?;
        Ok(task)
    }

    async fn check_priority(&self, id: &str) -> Result<()> {
        let priorities = list_as::<Priority>(self.store, Collection::Priorities).await?;
        if priorities.contains_key(id) {
            Ok(())
        } else {
            Err(Error::validation(
                "priority",
                format!("unknown priority id '{id}'"),
            ))
        }
    }

    async fn check_category(&self, id: &str) -> Result<()> {
        let categories = list_as::<Category>(self.store, Collection::Categories).await?;
        if categories.contains_key(id) {
            Ok(())
        } else {
            Err(Error::validation(
                "category",
                format!("unknown category id '{id}'"),
            ))
        }
    }
}
