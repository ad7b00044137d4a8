//! Read-only views of the gamification state.
//!
//! Reads still apply the daily challenge reset, the weekly refresh and combo
//! expiry, so a status call after midnight shows the new day's board.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use studyquest_core::gamification::challenges::{self, ChallengeUpdate};

use crate::context::{open_engine, print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusView {
    Combo,
    Progress,
    Weekly,
    Challenges,
    Medals,
    Profile,
}

#[derive(Serialize)]
struct ChallengeBoard {
    date: Option<NaiveDate>,
    challenges: Vec<ChallengeUpdate>,
    all_completed: bool,
    seconds_until_reset: i64,
}

pub fn run(view: StatusView, user: Option<String>) -> CliResult {
    let (mut engine, _config) = open_engine(user)?;
    match view {
        StatusView::Combo => print_json(&engine.get_combo_state()?),
        StatusView::Progress => print_json(&engine.get_progression_state()?),
        StatusView::Weekly => print_json(&engine.get_weekly_goal_state()?),
        StatusView::Challenges => {
            let state = engine.get_challenge_state()?;
            let board = ChallengeBoard {
                date: state.last_reset_date,
                challenges: state.board(),
                all_completed: state.all_completed(),
                seconds_until_reset: challenges::time_until_reset(engine.now()).num_seconds(),
            };
            print_json(&board)
        }
        StatusView::Medals => print_json(&engine.get_medal_state()?),
        StatusView::Profile => print_json(&engine.profile()?),
    }
}
