//! Daily challenges.
//!
//! Six independent objectives scoped to one local calendar day. Each pays
//! its bonus once per day; the whole state returns to zero values the first
//! time it is touched on a new date.
//!
//! | Challenge | Condition                              | Bonus |
//! |-----------|----------------------------------------|-------|
//! | dailyGoal | 3 tasks completed today                | 50    |
//! | speed     | 2 completions inside a 1-hour window   | 30    |
//! | priority  | 1 high-priority task                   | 40    |
//! | variety   | 3 distinct subjects                    | 35    |
//! | earlybird | any task before 09:00 local            | 20    |
//! | focus     | 25 minutes of timed study              | 25    |

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::events::Event;
use crate::profile::{lenient_date, Profile};
use crate::task::{CompletedTask, Priority};

/// Length of the speed challenge window.
pub const SPEED_WINDOW_MINUTES: i64 = 60;

/// Completions before this local hour count for the early-bird challenge.
pub const EARLY_BIRD_HOUR: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChallengeKind {
    DailyGoal,
    Speed,
    Priority,
    Variety,
    Earlybird,
    Focus,
}

impl ChallengeKind {
    pub const ALL: [ChallengeKind; 6] = [
        ChallengeKind::DailyGoal,
        ChallengeKind::Speed,
        ChallengeKind::Priority,
        ChallengeKind::Variety,
        ChallengeKind::Earlybird,
        ChallengeKind::Focus,
    ];

    /// Challenges the Challenge Champion medal asks for. The daily goal is
    /// not one of them.
    pub const CHAMPION_SET: [ChallengeKind; 5] = [
        ChallengeKind::Speed,
        ChallengeKind::Focus,
        ChallengeKind::Priority,
        ChallengeKind::Variety,
        ChallengeKind::Earlybird,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ChallengeKind::DailyGoal => "dailyGoal",
            ChallengeKind::Speed => "speed",
            ChallengeKind::Priority => "priority",
            ChallengeKind::Variety => "variety",
            ChallengeKind::Earlybird => "earlybird",
            ChallengeKind::Focus => "focus",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChallengeKind::DailyGoal => "Daily Goal",
            ChallengeKind::Speed => "Speed Demon",
            ChallengeKind::Priority => "Priority First",
            ChallengeKind::Variety => "Variety Pack",
            ChallengeKind::Earlybird => "Early Bird",
            ChallengeKind::Focus => "Focus Master",
        }
    }

    /// Progress needed to complete the challenge.
    pub fn target(self) -> u32 {
        match self {
            ChallengeKind::DailyGoal => 3,
            ChallengeKind::Speed => 2,
            ChallengeKind::Priority => 1,
            ChallengeKind::Variety => 3,
            ChallengeKind::Earlybird => 1,
            ChallengeKind::Focus => 25,
        }
    }

    /// Bonus points paid on completion.
    pub fn bonus(self) -> u64 {
        match self {
            ChallengeKind::DailyGoal => 50,
            ChallengeKind::Speed => 30,
            ChallengeKind::Priority => 40,
            ChallengeKind::Variety => 35,
            ChallengeKind::Earlybird => 20,
            ChallengeKind::Focus => 25,
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChallengeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChallengeKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown challenge '{s}'"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CountChallenge {
    pub count: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeedChallenge {
    pub count: u32,
    pub completed: bool,
    pub window_start: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FocusChallenge {
    pub minutes: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VarietyChallenge {
    pub subjects: Vec<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlagChallenge {
    pub completed: bool,
}

/// Today's challenge progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChallengeState {
    #[serde(alias = "lastReset", deserialize_with = "lenient_date")]
    pub last_reset_date: Option<NaiveDate>,
    pub speed: SpeedChallenge,
    pub focus: FocusChallenge,
    pub priority: CountChallenge,
    pub variety: VarietyChallenge,
    pub earlybird: FlagChallenge,
    pub daily_goal: CountChallenge,
}

/// Progress of one challenge after an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeUpdate {
    pub challenge: ChallengeKind,
    pub progress: u32,
    pub target: u32,
    pub completed: bool,
    /// True only for the update that completed the challenge.
    pub completed_now: bool,
}

impl ChallengeState {
    /// Zero state for `today`.
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            last_reset_date: Some(today),
            ..Self::default()
        }
    }

    /// Reset to zero values if the stored date is not `today`.
    pub fn ensure_current(&mut self, today: NaiveDate, events: &mut Vec<Event>) -> bool {
        if self.last_reset_date == Some(today) {
            return false;
        }
        tracing::info!(%today, previous = ?self.last_reset_date, "daily challenges reset");
        *self = Self::fresh(today);
        events.push(Event::ChallengesReset { date: today });
        true
    }

    pub fn progress(&self, kind: ChallengeKind) -> u32 {
        match kind {
            ChallengeKind::DailyGoal => self.daily_goal.count,
            ChallengeKind::Speed => self.speed.count,
            ChallengeKind::Priority => self.priority.count,
            ChallengeKind::Variety => u32::try_from(self.variety.subjects.len()).unwrap_or(u32::MAX),
            ChallengeKind::Earlybird => u32::from(self.earlybird.completed),
            ChallengeKind::Focus => self.focus.minutes,
        }
    }

    /// Progress for a challenge id; unknown ids have none.
    pub fn progress_by_id(&self, id: &str) -> u32 {
        id.parse().map(|kind| self.progress(kind)).unwrap_or(0)
    }

    pub fn is_completed(&self, kind: ChallengeKind) -> bool {
        match kind {
            ChallengeKind::DailyGoal => self.daily_goal.completed,
            ChallengeKind::Speed => self.speed.completed,
            ChallengeKind::Priority => self.priority.completed,
            ChallengeKind::Variety => self.variety.completed,
            ChallengeKind::Earlybird => self.earlybird.completed,
            ChallengeKind::Focus => self.focus.completed,
        }
    }

    pub fn all_completed(&self) -> bool {
        ChallengeKind::ALL.into_iter().all(|kind| self.is_completed(kind))
    }

    pub fn champion_set_completed(&self) -> bool {
        ChallengeKind::CHAMPION_SET.into_iter().all(|kind| self.is_completed(kind))
    }

    pub fn snapshot(&self, kind: ChallengeKind) -> ChallengeUpdate {
        ChallengeUpdate {
            challenge: kind,
            progress: self.progress(kind),
            target: kind.target(),
            completed: self.is_completed(kind),
            completed_now: false,
        }
    }

    /// One row per challenge, in display order.
    pub fn board(&self) -> Vec<ChallengeUpdate> {
        ChallengeKind::ALL.into_iter().map(|k| self.snapshot(k)).collect()
    }

    fn mark_completed(&mut self, kind: ChallengeKind) {
        match kind {
            ChallengeKind::DailyGoal => self.daily_goal.completed = true,
            ChallengeKind::Speed => self.speed.completed = true,
            ChallengeKind::Priority => self.priority.completed = true,
            ChallengeKind::Variety => self.variety.completed = true,
            ChallengeKind::Earlybird => self.earlybird.completed = true,
            ChallengeKind::Focus => self.focus.completed = true,
        }
    }

    /// Advance every task-driven slot for one completion counted at `now`.
    fn apply_task(&mut self, task: &CompletedTask, now: Timestamp) {
        self.daily_goal.count = self.daily_goal.count.saturating_add(1);

        let window_start = *self.speed.window_start.get_or_insert(now);
        if now.signed_duration_since(window_start) <= Duration::minutes(SPEED_WINDOW_MINUTES) {
            self.speed.count = self.speed.count.saturating_add(1);
        } else {
            self.speed.window_start = Some(now);
            self.speed.count = 1;
        }

        if task.priority == Priority::High {
            self.priority.count = 1;
        }

        if let Some(subject) = task.subject() {
            if !self.variety.subjects.iter().any(|s| s == subject) {
                self.variety.subjects.push(subject.to_string());
            }
        }
    }

    fn is_satisfied(&self, kind: ChallengeKind, task_hour: Option<u32>) -> bool {
        match kind {
            ChallengeKind::Earlybird => task_hour.is_some_and(|h| h < EARLY_BIRD_HOUR),
            other => self.progress(other) >= other.target(),
        }
    }
}

/// Mark and pay every satisfied, not-yet-completed challenge among `kinds`.
fn settle(
    profile: &mut Profile,
    kinds: &[ChallengeKind],
    task_hour: Option<u32>,
    events: &mut Vec<Event>,
) -> Vec<ChallengeUpdate> {
    let mut updates = Vec::with_capacity(kinds.len());
    for &kind in kinds {
        let state = &mut profile.challenge_state;
        let completed_now = !state.is_completed(kind) && state.is_satisfied(kind, task_hour);
        if completed_now {
            state.mark_completed(kind);
            profile.points = profile.points.saturating_add(kind.bonus());
            if kind == ChallengeKind::Speed {
                profile.speed_challenges_completed = profile.speed_challenges_completed.saturating_add(1);
            }
            tracing::info!(challenge = kind.id(), bonus = kind.bonus(), "daily challenge completed");
            events.push(Event::ChallengeCompleted {
                challenge: kind,
                bonus: kind.bonus(),
            });
        }

        let mut update = profile.challenge_state.snapshot(kind);
        update.completed_now = completed_now;
        updates.push(update);
    }
    updates
}

/// Update all task-driven challenges for one completion counted at `at`,
/// then pay any that became complete. The caller has already run
/// `ensure_current` for `at`'s date.
pub fn record_task(
    profile: &mut Profile,
    task: &CompletedTask,
    at: Timestamp,
    events: &mut Vec<Event>,
) -> Vec<ChallengeUpdate> {
    profile.challenge_state.apply_task(task, at);

    let task_kinds = [
        ChallengeKind::DailyGoal,
        ChallengeKind::Speed,
        ChallengeKind::Priority,
        ChallengeKind::Variety,
        ChallengeKind::Earlybird,
    ];
    settle(profile, &task_kinds, Some(at.hour()), events)
}

/// Add timed study minutes to the focus challenge.
pub fn record_study(profile: &mut Profile, minutes: u32, events: &mut Vec<Event>) -> ChallengeUpdate {
    let focus = &mut profile.challenge_state.focus;
    focus.minutes = focus.minutes.saturating_add(minutes);

    settle(profile, &[ChallengeKind::Focus], None, events)
        .pop()
        .unwrap_or_else(|| profile.challenge_state.snapshot(ChallengeKind::Focus))
}

/// Time left until the challenges roll over at the next local midnight.
pub fn time_until_reset(now: Timestamp) -> Duration {
    let Some(tomorrow) = now.date_naive().succ_opt() else {
        return Duration::zero();
    };
    let midnight = tomorrow.and_time(NaiveTime::MIN);
    midnight.signed_duration_since(now.naive_local())
}
