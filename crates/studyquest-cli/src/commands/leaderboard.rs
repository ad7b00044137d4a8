use crate::context::{open_engine, print_json, CliResult};

pub fn run(user: Option<String>) -> CliResult {
    let (engine, _config) = open_engine(user)?;
    print_json(&engine.leaderboard()?)
}
