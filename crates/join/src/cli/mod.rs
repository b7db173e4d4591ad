//! Command-line interface for join.
//!
//! This module provides the CLI structure and command definitions for the
//! `join` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AuthCommand, BoardCommand, ConfigCommand, ContactCommand, OutputFormat, StatusArg,
    SubtaskCommand, SummaryCommand, TaskCommand,
};

/// join - Kanban task management from the terminal
///
/// Tasks, contacts, and accounts live in a remote JSON document store;
/// every command reads or writes it directly.
#[derive(Debug, Parser)]
#[command(name = "join")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Accounts and sessions
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Manage contacts
    #[command(subcommand)]
    Contact(ContactCommand),

    /// Manage tasks
    #[command(subcommand)]
    Task(TaskCommand),

    /// Show the board and move tasks between columns
    #[command(subcommand)]
    Board(BoardCommand),

    /// Show the dashboard numbers
    Summary(SummaryCommand),

    /// Write the default category and priority tables to the store
    Seed {
        /// Overwrite tables that already have entries
        #[arg(long)]
        force: bool,
    },

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "join");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["join", "-q", "summary"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Quiet);

        let cli = Cli::try_parse_from(["join", "-v", "summary"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Verbose);

        let cli = Cli::try_parse_from(["join", "summary"]).unwrap();
        assert_eq!(cli.verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_parse_auth_login() {
        let cli =
            Cli::try_parse_from(["join", "auth", "login", "ada@example.com", "-p", "pw"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Auth(AuthCommand::Login { .. })
        ));
    }

    #[test]
    fn test_parse_contact_add() {
        let cli = Cli::try_parse_from([
            "join",
            "contact",
            "add",
            "Anton Mayer",
            "anton@example.com",
            "--mobile",
            "+49 170 1234567",
        ])
        .unwrap();
        match cli.command {
            Command::Contact(ContactCommand::Add { name, mobile, .. }) => {
                assert_eq!(name, "Anton Mayer");
                assert_eq!(mobile.as_deref(), Some("+49 170 1234567"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_task_add_with_assignees() {
        let cli = Cli::try_parse_from([
            "join",
            "task",
            "add",
            "Set up CI",
            "--due",
            "2025-06-01",
            "--category",
            "technical_task",
            "--assignee",
            "c1",
            "--assignee",
            "c2",
        ])
        .unwrap();
        match cli.command {
            Command::Task(TaskCommand::Add {
                assignees, priority, ..
            }) => {
                assert_eq!(assignees, ["c1", "c2"]);
                assert_eq!(priority, "medium");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_board_move() {
        let cli = Cli::try_parse_from(["join", "board", "move", "t1", "done"]).unwrap();
        match cli.command {
            Command::Board(BoardCommand::Move { task, column }) => {
                assert_eq!(task, "t1");
                assert_eq!(column, StatusArg::Done);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_subtask_done() {
        let cli = Cli::try_parse_from(["join", "task", "subtask", "done", "t1", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Task(TaskCommand::Subtask(SubtaskCommand::Done { index: 2, .. }))
        ));
    }

    #[test]
    fn test_parse_seed() {
        let cli = Cli::try_parse_from(["join", "seed", "--force"]).unwrap();
        assert!(matches!(cli.command, Command::Seed { force: true }));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["join", "-c", "/custom/config.toml", "summary"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }
}
