//! The Kanban board: status partition and column moves.
//!
//! Moving a task is the drag-and-drop of the original: the status field is
//! flipped on the local copy and a single PUT writes it back. Nothing else
//! coordinates concurrent moves; the last write wins.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::model::{Status, Task};
use crate::store::{put_as, Collection, DocumentStore};
use crate::tasks::TaskService;

/// One column of the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardColumn {
    /// The status this column holds.
    pub status: Status,
    /// Tasks in the column, sorted by due date then title.
    pub tasks: Vec<(String, Task)>,
}

impl BoardColumn {
    /// Whether the column has no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// The whole board, partitioned into the four columns in board order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Columns, left to right.
    pub columns: Vec<BoardColumn>,
}

impl BoardView {
    /// Partition a task map into columns.
    #[must_use]
    pub fn build(tasks: &BTreeMap<String, Task>) -> Self {
        let columns = Status::ALL
            .into_iter()
            .map(|status| {
                let mut column: Vec<(String, Task)> = tasks
                    .iter()
                    .filter(|(_, task)| task.status == status)
                    .map(|(id, task)| (id.clone(), task.clone()))
                    .collect();
                column.sort_by(|(_, a), (_, b)| {
                    a.due_date
                        .cmp(&b.due_date)
                        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
                });
                BoardColumn {
                    status,
                    tasks: column,
                }
            })
            .collect();
        Self { columns }
    }

    /// The column for a given status.
    ///
    /// # Panics
    ///
    /// Never panics; every status has a column by construction.
    #[must_use]
    pub fn column(&self, status: Status) -> &BoardColumn {
        self.columns
            .iter()
            .find(|column| column.status == status)
            .expect("board has a column per status")
    }

    /// Total number of tasks on the board.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }
}

/// Board operations against the remote store.
#[derive(Debug)]
pub struct Board<'a> {
    store: &'a dyn DocumentStore,
    tasks: TaskService<'a>,
}

impl<'a> Board<'a> {
    /// Build a board against the given store.
    #[must_use]
    pub fn new(store: &'a dyn DocumentStore, config: &crate::config::Config) -> Self {
        Self {
            store,
            tasks: TaskService::new(store, config),
        }
    }

    /// Fetch all tasks and partition them into columns.
    ///
    /// # Errors
    ///
    /// Returns an error if the store call fails.
    pub async fn view(&self) -> Result<BoardView> {
        Ok(BoardView::build(&self.tasks.list().await?))
    }

    /// Move a task to a column.
    ///
    /// The status is flipped on the fetched copy and written back with one
    /// PUT. Moving a task to its current column changes nothing and still
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an unknown task id.
    pub async fn move_task(&self, id: &str, target: Status) -> Result<Task> {
        let mut task = self.tasks.get(id).await?;
        if task.status == target {
            return Ok(task);
        }

        let from = task.status;
        task.status = target;
        put_as(self.store, Collection::Tasks, id, &task).await?;
        info!("moved task {id} from '{from}' to '{target}'");
        Ok(task)
    }

    /// Move a task one column to the right, saturating at `Done`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an unknown task id.
    pub async fn advance(&self, id: &str) -> Result<Task> {
        let task = self.tasks.get(id).await?;
        self.move_task(id, task.status.next()).await
    }

    /// Move a task one column to the left, saturating at `ToDo`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NotFound`] for an unknown task id.
    pub async fn retreat(&self, id: &str) -> Result<Task> {
        let task = self.tasks.get(id).await?;
        self.move_task(id, task.status.previous()).await
    }
}
