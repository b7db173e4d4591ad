//! The summary dashboard.
//!
//! Aggregates the numbers the start page shows: per-column counts, urgent
//! work, the next deadline, and the time-of-day greeting.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::auth::Session;
use crate::model::{Priority, Status, Task};

/// Aggregated board statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Tasks in the To Do column.
    pub to_do: usize,
    /// Tasks in the In Progress column.
    pub in_progress: usize,
    /// Tasks in the Await Feedback column.
    pub await_feedback: usize,
    /// Tasks in the Done column.
    pub done: usize,
    /// All tasks on the board.
    pub total: usize,
    /// Not-yet-done tasks with urgent priority.
    pub urgent: usize,
    /// The next deadline to worry about, if any.
    pub upcoming_deadline: Option<NaiveDate>,
}

impl Summary {
    /// Compute the dashboard numbers from a task map.
    ///
    /// The upcoming deadline is the earliest due date among not-done urgent
    /// tasks; with no urgent work it falls back to the earliest due date
    /// among all not-done tasks.
    #[must_use]
    pub fn build(tasks: &BTreeMap<String, Task>) -> Self {
        let count = |status: Status| tasks.values().filter(|t| t.status == status).count();

        let open = |task: &&Task| task.status != Status::Done;
        let urgent_open: Vec<&Task> = tasks
            .values()
            .filter(open)
            .filter(|t| t.priority == Priority::URGENT_ID)
            .collect();

        let upcoming_deadline = urgent_open
            .iter()
            .map(|t| t.due_date)
            .min()
            .or_else(|| tasks.values().filter(open).map(|t| t.due_date).min());

        Self {
            to_do: count(Status::ToDo),
            in_progress: count(Status::InProgress),
            await_feedback: count(Status::AwaitFeedback),
            done: count(Status::Done),
            total: tasks.len(),
            urgent: urgent_open.len(),
            upcoming_deadline,
        }
    }
}

/// The greeting for an hour of the day (0..=23).
#[must_use]
pub fn greeting(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Good morning",
        12..=17 => "Good afternoon",
        18..=21 => "Good evening",
        _ => "Good night",
    }
}

/// The greeting line, addressed to the session user when one is logged in.
#[must_use]
pub fn greeting_for(session: Option<&Session>, hour: u32) -> String {
    match session {
        Some(session) if !session.guest => format!("{}, {}", greeting(hour), session.name),
        _ => format!("{}!", greeting(hour)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(status: Status, priority: &str, due: &str) -> Task {
        Task {
            title: "t".to_string(),
            description: String::new(),
            assignees: Vec::new(),
            due_date: due.parse().unwrap(),
            priority: priority.to_string(),
            category: "technical_task".to_string(),
            subtasks: Vec::new(),
            status,
            created_at: Utc::now(),
        }
    }

    fn board(entries: Vec<Task>) -> BTreeMap<String, Task> {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, t)| (format!("t{i}"), t))
            .collect()
    }

    #[test]
    fn test_summary_counts_columns() {
        let tasks = board(vec![
            task(Status::ToDo, Priority::LOW_ID, "2025-01-01"),
            task(Status::ToDo, Priority::MEDIUM_ID, "2025-01-02"),
            task(Status::InProgress, Priority::LOW_ID, "2025-01-03"),
            task(Status::Done, Priority::LOW_ID, "2025-01-04"),
        ]);

        let summary = Summary::build(&tasks);
        assert_eq!(summary.to_do, 2);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.await_feedback, 0);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.total, 4);
    }

    #[test]
    fn test_summary_urgent_excludes_done() {
        let tasks = board(vec![
            task(Status::ToDo, Priority::URGENT_ID, "2025-01-01"),
            task(Status::Done, Priority::URGENT_ID, "2025-01-02"),
        ]);

        let summary = Summary::build(&tasks);
        assert_eq!(summary.urgent, 1);
    }

    #[test]
    fn test_upcoming_deadline_prefers_urgent() {
        let tasks = board(vec![
            task(Status::ToDo, Priority::LOW_ID, "2025-01-01"),
            task(Status::ToDo, Priority::URGENT_ID, "2025-03-01"),
        ]);

        let summary = Summary::build(&tasks);
        assert_eq!(
            summary.upcoming_deadline,
            Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_upcoming_deadline_falls_back_to_any_open_task() {
        let tasks = board(vec![
            task(Status::InProgress, Priority::LOW_ID, "2025-05-05"),
            task(Status::ToDo, Priority::MEDIUM_ID, "2025-02-02"),
        ]);

        let summary = Summary::build(&tasks);
        assert_eq!(
            summary.upcoming_deadline,
            Some(NaiveDate::from_ymd_opt(2025, 2, 2).unwrap())
        );
    }

    #[test]
    fn test_upcoming_deadline_none_when_all_done() {
        let tasks = board(vec![task(Status::Done, Priority::URGENT_ID, "2025-01-01")]);
        let summary = Summary::build(&tasks);
        assert_eq!(summary.upcoming_deadline, None);
    }

    #[test]
    fn test_summary_empty_board() {
        let summary = Summary::build(&BTreeMap::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.urgent, 0);
        assert_eq!(summary.upcoming_deadline, None);
    }

    #[test]
    fn test_greeting_hours() {
        assert_eq!(greeting(5), "Good morning");
        assert_eq!(greeting(11), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(17), "Good afternoon");
        assert_eq!(greeting(18), "Good evening");
        assert_eq!(greeting(21), "Good evening");
        assert_eq!(greeting(22), "Good night");
        assert_eq!(greeting(3), "Good night");
    }

    #[test]
    fn test_greeting_for_named_session() {
        let session = Session {
            admin_id: Some("a1".to_string()),
            name: "Ada".to_string(),
            initials: "A".to_string(),
            guest: false,
            logged_in_at: Utc::now(),
        };
        assert_eq!(greeting_for(Some(&session), 9), "Good morning, Ada");
    }

    #[test]
    fn test_greeting_for_guest_and_anonymous() {
        let guest = Session {
            admin_id: None,
            name: "Guest".to_string(),
            initials: "G".to_string(),
            guest: true,
            logged_in_at: Utc::now(),
        };
        assert_eq!(greeting_for(Some(&guest), 14), "Good afternoon!");
        assert_eq!(greeting_for(None, 23), "Good night!");
    }
}
