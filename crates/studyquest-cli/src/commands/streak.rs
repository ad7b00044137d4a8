use clap::Subcommand;

use crate::context::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Report the current day streak
    Set {
        /// Consecutive active days
        days: u32,
    },
}

pub fn run(action: StreakAction, user: Option<String>) -> CliResult {
    let (mut engine, _config) = open_engine(user)?;
    match action {
        StreakAction::Set { days } => print_json(&engine.on_day_streak_changed(days)?),
    }
}
