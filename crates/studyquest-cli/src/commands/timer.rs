//! Study timer commands.
//!
//! The countdown is persisted as JSON in the database's key-value table, one
//! entry per user, and advanced from the wall clock on every invocation. When
//! a run reaches zero the studied minutes are reported to the engine.

use clap::Subcommand;
use serde::Serialize;
use studyquest_core::{Database, StudyOutcome, StudyTimer, TimerState};

use crate::context::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the countdown
    Start {
        /// Session length in minutes (restarts the timer)
        #[arg(long)]
        minutes: Option<u32>,
    },
    /// Pause the countdown
    Pause,
    /// Reset to idle at full length
    Reset,
    /// Print current timer state as JSON
    Status,
}

#[derive(Serialize)]
struct TimerSnapshot {
    state: TimerState,
    duration_ms: u64,
    remaining_ms: u64,
    progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    finished: Option<StudyOutcome>,
}

fn timer_key(user: &str) -> String {
    format!("study_timer:{user}")
}

fn load_timer(db: &Database, key: &str, focus_minutes: u32) -> StudyTimer {
    match db.kv_get(key) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "discarding unreadable timer state");
            StudyTimer::new(focus_minutes)
        }),
        Ok(None) => StudyTimer::new(focus_minutes),
        Err(e) => {
            tracing::warn!(error = %e, "timer state unavailable");
            StudyTimer::new(focus_minutes)
        }
    }
}

fn save_timer(db: &Database, key: &str, timer: &StudyTimer) -> CliResult {
    let json = serde_json::to_string(timer)?;
    db.kv_set(key, &json)?;
    Ok(())
}

pub fn run(action: TimerAction, user: Option<String>) -> CliResult {
    let (mut engine, config) = open_engine(user)?;
    let key = timer_key(engine.user());
    let mut timer = load_timer(engine.store(), &key, config.timer.focus_minutes);
    let now_ms = u64::try_from(engine.now().timestamp_millis()).unwrap_or(0);

    // Settle elapsed time first so a finished run is credited exactly once.
    let finished = match timer.tick(now_ms) {
        Some(done) => Some(engine.on_study_session_ended(done.minutes_studied)?),
        None => None,
    };

    match action {
        TimerAction::Start { minutes } => {
            if let Some(minutes) = minutes {
                timer.set_duration_minutes(minutes);
            }
            timer.start(now_ms);
        }
        TimerAction::Pause => {
            timer.pause(now_ms);
        }
        TimerAction::Reset => timer.reset(),
        TimerAction::Status => {}
    }

    save_timer(engine.store(), &key, &timer)?;
    print_json(&TimerSnapshot {
        state: timer.state(),
        duration_ms: timer.duration_ms(),
        remaining_ms: timer.remaining_ms(),
        progress: timer.progress(),
        finished,
    })
}
