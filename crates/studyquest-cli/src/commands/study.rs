use clap::Subcommand;

use crate::context::{open_engine, print_json, CliResult};

#[derive(Subcommand)]
pub enum StudyAction {
    /// Record a finished study session
    Log {
        /// Minutes studied
        minutes: u32,
    },
}

pub fn run(action: StudyAction, user: Option<String>) -> CliResult {
    let (mut engine, _config) = open_engine(user)?;
    match action {
        StudyAction::Log { minutes } => print_json(&engine.on_study_session_ended(minutes)?),
    }
}
