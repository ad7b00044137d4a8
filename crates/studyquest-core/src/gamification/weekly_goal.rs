//! Weekly completion goal with a Monday week boundary.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::gamification::combo::Multiplier;
use crate::gamification::progression::{self, XpAward};
use crate::profile::{lenient_date, Profile};

pub const DEFAULT_WEEKLY_TARGET: u32 = 10;
pub const WEEKLY_GOAL_BONUS_XP: u64 = 50;

/// Monday on or before `date`. A Sunday belongs to the week that began the
/// previous Monday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyGoal {
    pub target: u32,
    pub completed: u32,
    #[serde(alias = "startDate", deserialize_with = "lenient_date")]
    pub week_start: Option<NaiveDate>,
}

impl Default for WeeklyGoal {
    fn default() -> Self {
        Self {
            target: DEFAULT_WEEKLY_TARGET,
            completed: 0,
            week_start: None,
        }
    }
}

impl WeeklyGoal {
    /// Start a new week if `today` lies past the stored one.
    ///
    /// Returns true when the counter was reset.
    pub fn refresh(&mut self, today: NaiveDate) -> bool {
        let current = week_start(today);
        match self.week_start {
            Some(start) if start >= current => false,
            _ => {
                self.week_start = Some(current);
                self.completed = 0;
                true
            }
        }
    }

    /// Completions counted for the week containing `today`.
    pub fn completed_in_week_of(&self, today: NaiveDate) -> u32 {
        if self.week_start == Some(week_start(today)) {
            self.completed
        } else {
            0
        }
    }

    pub fn is_reached(&self) -> bool {
        self.completed >= self.target
    }

    pub fn remaining(&self) -> u32 {
        self.target.saturating_sub(self.completed)
    }
}

/// Progress after counting one completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgress {
    pub completed: u32,
    pub target: u32,
    /// Bonus paid when this completion hit the target exactly.
    pub bonus: Option<XpAward>,
}

/// Count a completion on `today` toward the weekly goal.
pub fn record_completion(profile: &mut Profile, today: NaiveDate, events: &mut Vec<Event>) -> WeeklyProgress {
    if profile.weekly_goal.refresh(today) {
        tracing::debug!(week_start = ?profile.weekly_goal.week_start, "weekly goal reset");
    }

    let goal = &mut profile.weekly_goal;
    goal.completed = goal.completed.saturating_add(1);
    let (completed, target) = (goal.completed, goal.target);

    let bonus = if completed == target {
        events.push(Event::WeeklyGoalReached {
            target,
            bonus_xp: WEEKLY_GOAL_BONUS_XP,
        });
        Some(progression::award_xp(
            profile,
            WEEKLY_GOAL_BONUS_XP,
            Multiplier::BASE,
            events,
        ))
    } else {
        None
    };

    WeeklyProgress {
        completed,
        target,
        bonus,
    }
}
