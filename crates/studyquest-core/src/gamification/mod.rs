//! Progression and gamification rules.
//!
//! Each submodule owns one slice of the [`Profile`](crate::profile::Profile)
//! and exposes functions that mutate it and push [`Event`](crate::events::Event)s.
//! [`pipeline`] composes them in order.

pub mod challenges;
pub mod combo;
pub mod medals;
pub mod pipeline;
pub mod progression;
pub mod records;
pub mod weekly_goal;

pub use challenges::{ChallengeKind, ChallengeState, ChallengeUpdate};
pub use combo::{ComboState, Multiplier};
pub use medals::{MedalRule, MedalView, MEDAL_RULES};
pub use pipeline::{GameConfig, StudyOutcome, TaskOutcome, TickOutcome};
pub use progression::{xp_required_for_level, Reward, RewardKind, XpAward};
pub use records::{PersonalRecords, RecordKind};
pub use weekly_goal::WeeklyGoal;
