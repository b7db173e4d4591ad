//! `join` - CLI for Kanban task management
//!
//! This binary wires the subcommands to the library services. Every command
//! talks straight to the remote document store; there is no local cache.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::BTreeMap;

use chrono::{Local, Timelike};
use clap::Parser;

use join::cli::{
    AuthCommand, BoardCommand, Cli, Command, ConfigCommand, ContactCommand, OutputFormat,
    SubtaskCommand, SummaryCommand, TaskCommand,
};
use join::model::{seed_categories, seed_priorities, Contact, Status, Task};
use join::store::http::HttpStore;
use join::store::{put_as, Collection, DocumentStore};
use join::tasks::{TaskDraft, TaskUpdate};
use join::{init_logging, Authenticator, Board, Config, Directory, Summary, TaskService};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> CliResult {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;
    let store = HttpStore::new(config.store.base_url.clone());

    // Execute the command
    match cli.command {
        Command::Auth(cmd) => handle_auth(&store, &config, cmd).await,
        Command::Contact(cmd) => handle_contact(&store, &config, cmd).await,
        Command::Task(cmd) => handle_task(&store, &config, cmd).await,
        Command::Board(cmd) => handle_board(&store, &config, cmd).await,
        Command::Summary(cmd) => handle_summary(&store, &config, cmd).await,
        Command::Seed { force } => handle_seed(&store, force).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

async fn handle_auth(store: &HttpStore, config: &Config, cmd: AuthCommand) -> CliResult {
    let auth = Authenticator::new(store, config)?;
    match cmd {
        AuthCommand::Signup {
            name,
            email,
            password,
        } => {
            let (id, admin) = auth.sign_up(&name, &email, &password).await?;
            println!("Registered {} <{}> as {id}", admin.name, admin.email);
            println!("Log in with: join auth login {}", admin.email);
        }
        AuthCommand::Login { email, password } => {
            let session = auth.log_in(&email, &password).await?;
            println!("Logged in as {} ({})", session.name, session.initials);
        }
        AuthCommand::Guest => {
            auth.guest()?;
            println!("Browsing as guest.");
        }
        AuthCommand::Logout => {
            if auth.log_out()? {
                println!("Logged out.");
            } else {
                println!("No session was open.");
            }
        }
        AuthCommand::Whoami { json } => match auth.current()? {
            Some(session) if json => println!("{}", serde_json::to_string_pretty(&session)?),
            Some(session) => {
                let kind = if session.guest { "guest" } else { "admin" };
                println!("{} ({}) [{kind}]", session.name, session.initials);
                println!("Logged in at {}", session.logged_in_at.to_rfc3339());
            }
            None => println!("Not logged in."),
        },
    }
    Ok(())
}

async fn handle_contact(store: &HttpStore, config: &Config, cmd: ContactCommand) -> CliResult {
    let directory = Directory::new(store, config)?;
    match cmd {
        ContactCommand::Add {
            name,
            email,
            mobile,
        } => {
            let (id, contact) = directory.create(&name, &email, mobile).await?;
            println!("Added {} ({}) as {id}", contact.name, contact.initials);
        }
        ContactCommand::List { grouped, format } => {
            if grouped {
                for (letter, entries) in directory.grouped().await? {
                    println!("{letter}");
                    for (id, contact) in entries {
                        println!("  {:<24} {} <{}>", id, contact.name, contact.email);
                    }
                }
            } else {
                let contacts = directory.list().await?;
                print_contacts(&contacts, format)?;
            }
        }
        ContactCommand::Show { id } => {
            let contact = directory.get(&id).await?;
            print_contact(&id, &contact);
        }
        ContactCommand::Edit {
            id,
            name,
            email,
            mobile,
        } => {
            let update = join::contacts::ContactUpdate {
                name,
                email,
                mobile,
            };
            if update.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let contact = directory.update(&id, update).await?;
            println!("Updated {id}");
            print_contact(&id, &contact);
        }
        ContactCommand::Remove { id } => {
            if directory.remove(&id).await? {
                println!("Removed contact {id}");
                println!("Tasks assigned to this contact keep the stale reference.");
            } else {
                println!("No contact {id}");
            }
        }
    }
    Ok(())
}

async fn handle_task(store: &HttpStore, config: &Config, cmd: TaskCommand) -> CliResult {
    let service = TaskService::new(store, config);
    match cmd {
        TaskCommand::Add {
            title,
            description,
            due,
            priority,
            category,
            assignees,
            status,
        } => {
            let (id, task) = service
                .create(TaskDraft {
                    title,
                    description,
                    assignees,
                    due_date: due,
                    priority,
                    category,
                    status: status.map(Status::from),
                })
                .await?;
            println!("Added '{}' as {id} in {}", task.title, task.status.label());
        }
        TaskCommand::List {
            status,
            assignee,
            search,
            format,
        } => {
            let tasks: Vec<(String, Task)> = match search {
                Some(term) => service.search(&term).await?,
                None => service.list().await?.into_iter().collect(),
            };
            let status = status.map(Status::from);
            let filtered: Vec<(String, Task)> = tasks
                .into_iter()
                .filter(|(_, task)| status.map_or(true, |s| task.status == s))
                .filter(|(_, task)| {
                    assignee
                        .as_ref()
                        .map_or(true, |a| task.assignees.contains(a))
                })
                .collect();
            print_tasks(&filtered, format)?;
        }
        TaskCommand::Show { id } => {
            let task = service.get(&id).await?;
            let directory = Directory::new(store, config)?;
            let contacts: BTreeMap<String, Contact> =
                directory.list().await?.into_iter().collect();
            print_task(&id, &task, &contacts);
        }
        TaskCommand::Edit {
            id,
            title,
            description,
            due,
            priority,
            category,
            assignees,
        } => {
            let task = service
                .update(
                    &id,
                    TaskUpdate {
                        title,
                        description,
                        assignees,
                        due_date: due,
                        priority,
                        category,
                    },
                )
                .await?;
            println!("Updated '{}'", task.title);
        }
        TaskCommand::Remove { id } => {
            if service.remove(&id).await? {
                println!("Removed task {id}");
            } else {
                println!("No task {id}");
            }
        }
        TaskCommand::Subtask(sub) => handle_subtask(&service, sub).await?,
    }
    Ok(())
}

async fn handle_subtask(service: &TaskService<'_>, cmd: SubtaskCommand) -> CliResult {
    match cmd {
        SubtaskCommand::Add { task, title } => {
            let updated = service.add_subtask(&task, &title).await?;
            let (done, total) = updated.subtask_progress();
            println!("Added item; checklist now {done}/{total}");
        }
        SubtaskCommand::Done { task, index } => {
            let updated = service.set_subtask_done(&task, index, true).await?;
            let (done, total) = updated.subtask_progress();
            println!("Checked '{}'; {done}/{total} done", updated.subtasks[index].title);
        }
        SubtaskCommand::Undone { task, index } => {
            let updated = service.set_subtask_done(&task, index, false).await?;
            let (done, total) = updated.subtask_progress();
            println!("Unchecked '{}'; {done}/{total} done", updated.subtasks[index].title);
        }
        SubtaskCommand::Remove { task, index } => {
            let updated = service.remove_subtask(&task, index).await?;
            println!("Removed item; {} left", updated.subtasks.len());
        }
    }
    Ok(())
}

async fn handle_board(store: &HttpStore, config: &Config, cmd: BoardCommand) -> CliResult {
    let board = Board::new(store, config);
    match cmd {
        BoardCommand::Show { format } => {
            let view = board.view().await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
                _ => {
                    for column in &view.columns {
                        println!("{} ({})", column.status.label(), column.tasks.len());
                        if column.is_empty() {
                            println!("  No tasks");
                        }
                        for (id, task) in &column.tasks {
                            let (done, total) = task.subtask_progress();
                            println!(
                                "  {:<24} {:<32} due {}  [{done}/{total}]",
                                id, task.title, task.due_date
                            );
                        }
                        println!();
                    }
                }
            }
        }
        BoardCommand::Move { task, column } => {
            let moved = board.move_task(&task, column.into()).await?;
            println!("Moved '{}' to {}", moved.title, moved.status.label());
        }
        BoardCommand::Advance { task } => {
            let moved = board.advance(&task).await?;
            println!("Moved '{}' to {}", moved.title, moved.status.label());
        }
        BoardCommand::Retreat { task } => {
            let moved = board.retreat(&task).await?;
            println!("Moved '{}' to {}", moved.title, moved.status.label());
        }
    }
    Ok(())
}

async fn handle_summary(store: &HttpStore, config: &Config, cmd: SummaryCommand) -> CliResult {
    let service = TaskService::new(store, config);
    let summary = Summary::build(&service.list().await?);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let auth = Authenticator::new(store, config)?;
    let session = auth.current()?;
    println!(
        "{}",
        join::summary::greeting_for(session.as_ref(), Local::now().hour())
    );
    println!();
    println!("To Do           {:>4}", summary.to_do);
    println!("In Progress     {:>4}", summary.in_progress);
    println!("Await Feedback  {:>4}", summary.await_feedback);
    println!("Done            {:>4}", summary.done);
    println!("---------------------");
    println!("Total           {:>4}", summary.total);
    println!("Urgent          {:>4}", summary.urgent);
    match summary.upcoming_deadline {
        Some(date) => println!("Next deadline   {date}"),
        None => println!("Next deadline   none"),
    }
    Ok(())
}

async fn handle_seed(store: &HttpStore, force: bool) -> CliResult {
    let categories = store.list(Collection::Categories).await?;
    if categories.is_empty() || force {
        for (id, category) in seed_categories() {
            put_as(store, Collection::Categories, &id, &category).await?;
        }
        println!("Seeded categories.");
    } else {
        println!("Categories already present; use --force to overwrite.");
    }

    let priorities = store.list(Collection::Priorities).await?;
    if priorities.is_empty() || force {
        for (id, priority) in seed_priorities() {
            put_as(store, Collection::Priorities, &id, &priority).await?;
        }
        println!("Seeded priorities.");
    } else {
        println!("Priorities already present; use --force to overwrite.");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> CliResult {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Store]");
                println!("  Base URL:        {}", config.store.base_url);
                println!();
                println!("[Session]");
                println!("  Session file:    {}", config.session_path().display());
                println!();
                println!("[Board]");
                println!(
                    "  Initial column:  {}",
                    config.board.initial_status.label()
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

fn print_contacts(contacts: &[(String, Contact)], format: OutputFormat) -> CliResult {
    match format {
        OutputFormat::Json => {
            let map: BTreeMap<&str, &Contact> = contacts
                .iter()
                .map(|(id, contact)| (id.as_str(), contact))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Table => {
            println!(
                "{:<24} {:<24} {:<28} {:<16}",
                "ID", "NAME", "EMAIL", "MOBILE"
            );
            for (id, contact) in contacts {
                println!(
                    "{:<24} {:<24} {:<28} {:<16}",
                    id,
                    contact.name,
                    contact.email,
                    contact.mobile.as_deref().unwrap_or("-")
                );
            }
        }
        OutputFormat::Plain => {
            for (id, contact) in contacts {
                println!("{id}  {} <{}>", contact.name, contact.email);
            }
        }
    }
    Ok(())
}

fn print_contact(id: &str, contact: &Contact) {
    println!("{} ({})", contact.name, contact.initials);
    println!("  Id:     {id}");
    println!("  Email:  {}", contact.email);
    println!("  Mobile: {}", contact.mobile.as_deref().unwrap_or("-"));
    println!("  Badge:  {}", contact.color);
}

fn print_tasks(tasks: &[(String, Task)], format: OutputFormat) -> CliResult {
    match format {
        OutputFormat::Json => {
            let map: BTreeMap<&str, &Task> = tasks
                .iter()
                .map(|(id, task)| (id.as_str(), task))
                .collect();
            println!("{}", serde_json::to_string_pretty(&map)?);
        }
        OutputFormat::Table => {
            println!(
                "{:<24} {:<32} {:<15} {:<10} {:<10} {:<6}",
                "ID", "TITLE", "STATUS", "DUE", "PRIORITY", "ITEMS"
            );
            for (id, task) in tasks {
                let (done, total) = task.subtask_progress();
                println!(
                    "{:<24} {:<32} {:<15} {:<10} {:<10} {done}/{total}",
                    id,
                    task.title,
                    task.status.label(),
                    task.due_date.to_string(),
                    task.priority
                );
            }
        }
        OutputFormat::Plain => {
            for (id, task) in tasks {
                println!("{id}  {}  [{}]", task.title, task.status.label());
            }
        }
    }
    Ok(())
}

fn print_task(id: &str, task: &Task, contacts: &BTreeMap<String, Contact>) {
    println!("{}", task.title);
    println!("  Id:          {id}");
    println!("  Status:      {}", task.status.label());
    println!("  Due:         {}", task.due_date);
    println!("  Priority:    {}", task.priority);
    println!("  Category:    {}", task.category);
    if !task.description.is_empty() {
        println!("  Description: {}", task.description);
    }
    if !task.assignees.is_empty() {
        let names: Vec<&str> = task
            .assignees
            .iter()
            .map(|assignee| {
                contacts
                    .get(assignee)
                    .map_or("(unknown contact)", |c| c.name.as_str())
            })
            .collect();
        println!("  Assigned:    {}", names.join(", "));
    }
    if !task.subtasks.is_empty() {
        let (done, total) = task.subtask_progress();
        println!("  Checklist:   {done}/{total}");
        for (index, subtask) in task.subtasks.iter().enumerate() {
            let mark = if subtask.done { "x" } else { " " };
            println!("    [{mark}] {index}: {}", subtask.title);
        }
    }
}
