//! Personal records: high-water marks that never move backwards.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::profile::Profile;
use crate::task::CompletedTask;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalRecords {
    /// Most tasks completed in one day.
    pub best_day: u32,
    /// Longest day streak.
    pub longest_streak: u32,
    /// Most tasks completed in one week.
    pub most_tasks_week: u32,
    /// Quickest start-to-finish task, in minutes.
    pub fastest_task: Option<u32>,
    /// Lifetime timed study, in minutes.
    pub total_study_time: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    BestDay,
    LongestStreak,
    MostTasksWeek,
    FastestTask,
    TotalStudyTime,
}

/// Update records after a task completion. Runs after the weekly goal and
/// the daily challenges have counted the task.
pub fn record_task(profile: &mut Profile, task: &CompletedTask, events: &mut Vec<Event>) {
    let today_count = profile.challenge_state.daily_goal.count;
    let week_count = profile.weekly_goal.completed;
    let records = &mut profile.personal_records;

    if today_count > records.best_day {
        records.best_day = today_count;
        events.push(Event::PersonalRecord {
            record: RecordKind::BestDay,
            value: u64::from(today_count),
        });
    }

    records.most_tasks_week = records.most_tasks_week.max(week_count);

    if let Some(minutes) = task.duration_minutes() {
        if records.fastest_task.map_or(true, |best| minutes < best) {
            records.fastest_task = Some(minutes);
        }
    }

    record_streak(profile);
}

/// Fold the current day streak into the best streak and the record.
pub fn record_streak(profile: &mut Profile) {
    profile.best_streak = profile.best_streak.max(profile.streak);
    let records = &mut profile.personal_records;
    records.longest_streak = records.longest_streak.max(profile.best_streak);
}

pub fn record_study(profile: &mut Profile) {
    let records = &mut profile.personal_records;
    records.total_study_time = records.total_study_time.max(profile.study_time.total_minutes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use chrono::{DateTime, Duration};

    fn task_taking(minutes: i64) -> CompletedTask {
        let done = DateTime::parse_from_rfc3339("2026-10-19T12:00:00+00:00").unwrap();
        CompletedTask::new("t", Priority::Medium, done).with_started_at(done - Duration::minutes(minutes))
    }

    #[test]
    fn test_best_day_only_rises() {
        let mut profile = Profile::default();
        let mut events = Vec::new();
        profile.challenge_state.daily_goal.count = 4;
        record_task(&mut profile, &task_taking(30), &mut events);
        assert_eq!(profile.personal_records.best_day, 4);
        assert_eq!(events.len(), 1);

        profile.challenge_state.daily_goal.count = 2;
        record_task(&mut profile, &task_taking(30), &mut events);
        assert_eq!(profile.personal_records.best_day, 4);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_fastest_task_keeps_minimum() {
        let mut profile = Profile::default();
        let mut events = Vec::new();
        record_task(&mut profile, &task_taking(40), &mut events);
        record_task(&mut profile, &task_taking(12), &mut events);
        record_task(&mut profile, &task_taking(25), &mut events);
        assert_eq!(profile.personal_records.fastest_task, Some(12));
    }

    #[test]
    fn test_streak_record() {
        let mut profile = Profile {
            streak: 6,
            ..Profile::default()
        };
        record_streak(&mut profile);
        profile.streak = 2;
        record_streak(&mut profile);
        assert_eq!(profile.best_streak, 6);
        assert_eq!(profile.personal_records.longest_streak, 6);
    }
}
