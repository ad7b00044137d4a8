//! Task completion reporting.

use chrono::Duration;
use clap::Subcommand;
use studyquest_core::{CompletedTask, Priority};
use uuid::Uuid;

use crate::context::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Record a completed task and print what it earned
    Complete {
        /// Task priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Subject the task belongs to
        #[arg(long)]
        subject: Option<String>,
        /// Task ID (a fresh UUID if omitted)
        #[arg(long)]
        id: Option<String>,
        /// When the task was started, in minutes before now
        #[arg(long)]
        started_minutes_ago: Option<u32>,
    },
}

pub fn run(action: TaskAction, user: Option<String>) -> CliResult {
    let (mut engine, _config) = open_engine(user)?;

    match action {
        TaskAction::Complete {
            priority,
            subject,
            id,
            started_minutes_ago,
        } => {
            let priority: Priority = priority.parse()?;
            let now = engine.now();
            let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

            let mut task = CompletedTask::new(id, priority, now);
            if let Some(subject) = subject {
                task = task.with_subject(subject);
            }
            if let Some(minutes) = started_minutes_ago {
                task = task.with_started_at(now - Duration::minutes(i64::from(minutes)));
            }

            let outcome = engine.on_task_completed(&task)?;
            print_json(&outcome)?;
        }
    }
    Ok(())
}
