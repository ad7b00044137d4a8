//! Weekly summary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Productivity {
    Outstanding,
    Good,
    GettingStarted,
    Idle,
}

impl Productivity {
    pub fn for_tasks(tasks: u32) -> Self {
        if tasks >= 10 {
            Productivity::Outstanding
        } else if tasks >= 5 {
            Productivity::Good
        } else if tasks >= 1 {
            Productivity::GettingStarted
        } else {
            Productivity::Idle
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Productivity::Outstanding => "Outstanding week! Keep it up.",
            Productivity::Good => "Good progress this week.",
            Productivity::GettingStarted => "A start. Try to finish a few more tasks.",
            Productivity::Idle => "No tasks this week yet.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub week_start: NaiveDate,
    pub tasks_this_week: u32,
    pub weekly_target: u32,
    pub streak: u32,
    pub best_streak: u32,
    /// Lifetime study time in hours, one decimal.
    pub study_hours: f64,
    pub study_minutes_today: u32,
    pub productivity: Productivity,
}

impl WeeklyReport {
    pub fn for_profile(profile: &Profile, today: NaiveDate) -> Self {
        let tasks_this_week = profile.weekly_goal.completed_in_week_of(today);
        let hours = profile.study_time.total_minutes as f64 / 60.0;
        Self {
            week_start: crate::gamification::weekly_goal::week_start(today),
            tasks_this_week,
            weekly_target: profile.weekly_goal.target,
            streak: profile.streak,
            best_streak: profile.best_streak.max(profile.streak),
            study_hours: (hours * 10.0).round() / 10.0,
            study_minutes_today: profile.study_time.minutes_on(today),
            productivity: Productivity::for_tasks(tasks_this_week),
        }
    }
}
