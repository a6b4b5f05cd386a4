use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::database::Database;
use crate::error::PlannerError;
use crate::models::{
    CycleInput, CycleRecord, Event, EventDraft, Notification, Priority, Task, TaskChanges,
    TaskDraft, DEFAULT_CATEGORY, DEFAULT_PERIOD_LENGTH,
};
use crate::planner::Planner;
use crate::projection::DateRange;
use crate::utils::{parse_date, today};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Tempo - priority tasks, events and cycle tracking in the terminal")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    /// Owner whose records are read and written (defaults to config's default_owner)
    #[arg(short, long)]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive dashboard (default if no subcommand)
    Tui,
    /// Add a new task
    AddTask {
        /// Task title
        title: String,
        /// High, Medium or Low
        #[arg(long, default_value = "Medium")]
        priority: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Change fields of an existing task
    EditTask {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Mark a task as completed
    CompleteTask { id: i64 },
    /// Delete a task
    DeleteTask { id: i64 },
    /// List tasks, most urgent first
    Tasks,
    /// Add a calendar event
    AddEvent {
        title: String,
        /// Event date (YYYY-MM-DD)
        date: String,
        /// Workout, Study or anything else
        #[arg(long, default_value = "Other")]
        category: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a calendar event
    DeleteEvent { id: i64 },
    /// List events by date
    Events,
    /// Record the start of the last period
    TrackCycle {
        /// First day of the last period (YYYY-MM-DD)
        last_date: String,
        /// Days between period starts
        cycle_length: i64,
        /// Days a period lasts
        #[arg(long, default_value_t = DEFAULT_PERIOD_LENGTH)]
        period_length: i64,
    },
    /// Show tracked cycles, latest first
    Cycles,
    /// Show today's reminders
    Notifications,
    /// Print calendar entries as JSON (defaults to the current month)
    Calendar {
        /// Inclusive start (YYYY-MM-DD)
        #[arg(long, requires = "end")]
        start: Option<String>,
        /// Exclusive end (YYYY-MM-DD)
        #[arg(long, requires = "start")]
        end: Option<String>,
    },
    /// Print task and event statistics as JSON
    Analytics,
    /// Delete every task, event and cycle of the user
    DeleteAccount {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Planner(#[from] PlannerError),
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("Failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    InvalidArgument(String),
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, CliError> {
    parse_date(value)
        .map_err(|e| CliError::DateParseError(format!("Invalid date format '{}': {}", value, e)))
}

fn parse_optional_date(value: Option<String>) -> Result<Option<NaiveDate>, CliError> {
    value.as_deref().map(parse_date_arg).transpose()
}

/// Handle the add-task command
pub fn handle_add_task(
    planner: &Planner<Database>,
    owner: &str,
    title: String,
    priority: String,
    due: Option<String>,
    category: String,
    description: Option<String>,
) -> Result<(), CliError> {
    let mut draft = TaskDraft::new(title, Priority::parse(&priority), parse_optional_date(due)?)
        .with_category(category);
    if let Some(description) = description {
        draft = draft.with_description(description);
    }

    let task = planner.add_task(owner, &draft, Utc::now())?;
    println!("Task created successfully (ID: {})", task.id);
    Ok(())
}

/// Handle the edit-task command
pub fn handle_edit_task(
    planner: &Planner<Database>,
    owner: &str,
    id: i64,
    changes: TaskChanges,
) -> Result<(), CliError> {
    if changes.is_empty() {
        return Err(CliError::InvalidArgument("Nothing to update".to_string()));
    }
    let task = planner.update_task(owner, id, &changes)?;
    println!("Task updated: {}", format_task(&task));
    Ok(())
}

/// Collect edit-task flags into a change set
pub fn task_changes(
    title: Option<String>,
    priority: Option<String>,
    due: Option<String>,
    category: Option<String>,
    description: Option<String>,
) -> Result<TaskChanges, CliError> {
    Ok(TaskChanges {
        title,
        description,
        priority: priority.as_deref().map(Priority::parse),
        due_date: parse_optional_date(due)?,
        category,
    })
}

pub fn handle_complete_task(planner: &Planner<Database>, owner: &str, id: i64) -> Result<(), CliError> {
    let task = planner.complete_task(owner, id, Utc::now())?;
    println!("Task completed: {}", task.title);
    Ok(())
}

pub fn handle_delete_task(planner: &Planner<Database>, owner: &str, id: i64) -> Result<(), CliError> {
    planner.delete_task(owner, id)?;
    println!("Task {} deleted", id);
    Ok(())
}

pub fn handle_tasks(planner: &Planner<Database>, owner: &str) -> Result<(), CliError> {
    let tasks = planner.ordered_tasks(owner, today())?;
    if tasks.is_empty() {
        println!("No tasks");
    }
    for task in &tasks {
        println!("{}", format_task(task));
    }
    Ok(())
}

pub fn handle_add_event(
    planner: &Planner<Database>,
    owner: &str,
    title: String,
    date: String,
    category: String,
    description: Option<String>,
) -> Result<(), CliError> {
    let mut draft = EventDraft::new(title, parse_date_arg(&date)?, category);
    if let Some(description) = description {
        draft = draft.with_description(description);
    }
    let event = planner.add_event(owner, &draft, Utc::now())?;
    println!("Event created successfully (ID: {})", event.id);
    Ok(())
}

pub fn handle_delete_event(planner: &Planner<Database>, owner: &str, id: i64) -> Result<(), CliError> {
    planner.delete_event(owner, id)?;
    println!("Event {} deleted", id);
    Ok(())
}

pub fn handle_events(planner: &Planner<Database>, owner: &str) -> Result<(), CliError> {
    let events = planner.events(owner)?;
    if events.is_empty() {
        println!("No events");
    }
    for event in &events {
        println!("{}", format_event(event));
    }
    Ok(())
}

pub fn handle_track_cycle(
    planner: &Planner<Database>,
    owner: &str,
    last_date: String,
    cycle_length: i64,
    period_length: i64,
) -> Result<(), CliError> {
    let input = CycleInput::new(parse_date_arg(&last_date)?, cycle_length)
        .with_period_length(period_length);
    let record = planner.track_cycle(owner, &input, Utc::now())?;
    println!("{}", format_cycle(&record));
    Ok(())
}

pub fn handle_cycles(planner: &Planner<Database>, owner: &str) -> Result<(), CliError> {
    let cycles = planner.cycles(owner)?;
    if cycles.is_empty() {
        println!("No cycles tracked");
    }
    for record in &cycles {
        println!("{}", format_cycle(record));
    }
    Ok(())
}

pub fn handle_notifications(planner: &Planner<Database>, owner: &str) -> Result<(), CliError> {
    let notifications = planner.notifications(owner, today())?;
    if notifications.is_empty() {
        println!("Nothing due today");
    }
    for notification in &notifications {
        println!("{}", format_notification(notification));
    }
    Ok(())
}

/// Resolve calendar flags: both bounds, or the current month when neither is given
pub fn calendar_range(start: Option<String>, end: Option<String>, today: NaiveDate) -> Result<DateRange, CliError> {
    match (start, end) {
        (Some(start), Some(end)) => Ok(DateRange::parse(&start, &end)?),
        (None, None) => Ok(DateRange::month_of(today)),
        _ => Err(CliError::InvalidArgument(
            "--start and --end must be given together".to_string(),
        )),
    }
}

pub fn handle_calendar(
    planner: &Planner<Database>,
    owner: &str,
    start: Option<String>,
    end: Option<String>,
) -> Result<(), CliError> {
    let range = calendar_range(start, end, today())?;
    let entries = planner.calendar(owner, &range)?;
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

pub fn handle_analytics(planner: &Planner<Database>, owner: &str) -> Result<(), CliError> {
    let analytics = planner.analytics(owner, today())?;
    println!("{}", serde_json::to_string_pretty(&analytics)?);
    Ok(())
}

pub fn handle_delete_account(planner: &Planner<Database>, owner: &str, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::InvalidArgument(format!(
            "Refusing to delete all data of '{}' without --yes",
            owner
        )));
    }
    let removed = planner.delete_account(owner)?;
    println!("Deleted {} records of '{}'", removed, owner);
    Ok(())
}

pub fn format_task(task: &Task) -> String {
    let status = if task.completed { "x" } else { " " };
    let due = task
        .due_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "no due date".to_string());
    format!(
        "[{}] #{} {} ({}, {}, {})",
        status,
        task.id,
        task.title,
        task.priority,
        due,
        task.category
    )
}

fn format_event(event: &Event) -> String {
    format!("#{} {} {} [{}]", event.id, event.date, event.title, event.category)
}

fn format_cycle(record: &CycleRecord) -> String {
    format!(
        "#{} last {} | next {} | fertile {} to {} | {}/{} days",
        record.id,
        record.last_date,
        record.next_date,
        record.fertility_start,
        record.fertility_end,
        record.cycle_length,
        record.period_length
    )
}

fn format_notification(notification: &Notification) -> String {
    format!("{:?}: {} ({})", notification.kind, notification.title, notification.due)
}
