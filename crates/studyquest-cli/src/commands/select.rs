use clap::ValueEnum;
use serde::Serialize;
use studyquest_core::RewardKind;

use crate::context::{open_engine, print_json, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum SelectKind {
    Avatar,
    Title,
    Theme,
}

impl From<SelectKind> for RewardKind {
    fn from(kind: SelectKind) -> Self {
        match kind {
            SelectKind::Avatar => RewardKind::Avatar,
            SelectKind::Title => RewardKind::Title,
            SelectKind::Theme => RewardKind::Theme,
        }
    }
}

#[derive(Serialize)]
struct Selected<'a> {
    kind: RewardKind,
    selected: &'a str,
}

pub fn run(kind: SelectKind, name: &str, user: Option<String>) -> CliResult {
    let (mut engine, _config) = open_engine(user)?;
    let kind = RewardKind::from(kind);
    engine.select(kind, name)?;
    print_json(&Selected { kind, selected: name })
}
