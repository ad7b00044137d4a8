//! Medal (achievement) evaluator.
//!
//! Medals are declared as data: an id plus a [`Criterion`] over a snapshot of
//! the profile. Evaluation unlocks every satisfied medal once. Unlocking pays
//! points, which can in turn satisfy a points medal, so evaluation repeats
//! until a pass unlocks nothing; the final set does not depend on rule order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::profile::Profile;

pub const MEDAL_BONUS_POINTS: u64 = 100;

/// Profile figures the criteria read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalContext {
    pub completed_tasks: u64,
    pub streak: u32,
    pub best_streak: u32,
    pub points: u64,
    pub all_challenges_complete: bool,
    pub speed_challenges_completed: u32,
    pub study_minutes: u64,
}

impl MedalContext {
    pub fn from_profile(profile: &Profile, today: NaiveDate) -> Self {
        let challenges = &profile.challenge_state;
        Self {
            completed_tasks: profile.completed_tasks_count,
            streak: profile.streak,
            best_streak: profile.best_streak,
            points: profile.points,
            all_challenges_complete: challenges.last_reset_date == Some(today)
                && challenges.champion_set_completed(),
            speed_challenges_completed: profile.speed_challenges_completed,
            study_minutes: profile.study_time.total_minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    TasksCompleted(u64),
    /// Satisfied by the current or the best-ever day streak.
    DayStreak(u32),
    Points(u64),
    AllDailyChallenges,
    SpeedChallenges(u32),
    StudyMinutes(u64),
}

impl Criterion {
    pub fn is_met(&self, ctx: &MedalContext) -> bool {
        match *self {
            Criterion::TasksCompleted(n) => ctx.completed_tasks >= n,
            Criterion::DayStreak(n) => ctx.streak >= n || ctx.best_streak >= n,
            Criterion::Points(n) => ctx.points >= n,
            Criterion::AllDailyChallenges => ctx.all_challenges_complete,
            Criterion::SpeedChallenges(n) => ctx.speed_challenges_completed >= n,
            Criterion::StudyMinutes(n) => ctx.study_minutes >= n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedalRule {
    pub id: &'static str,
    pub name: &'static str,
    pub criterion: Criterion,
}

const fn rule(id: &'static str, name: &'static str, criterion: Criterion) -> MedalRule {
    MedalRule { id, name, criterion }
}

pub const MEDAL_RULES: &[MedalRule] = &[
    rule("first-task", "First Steps", Criterion::TasksCompleted(1)),
    rule("5-tasks", "Getting Started", Criterion::TasksCompleted(5)),
    rule("10-tasks", "Task Master", Criterion::TasksCompleted(10)),
    rule("25-tasks", "Productive", Criterion::TasksCompleted(25)),
    rule("50-tasks", "Unstoppable", Criterion::TasksCompleted(50)),
    rule("100-tasks", "Centurion", Criterion::TasksCompleted(100)),
    rule("3-day-streak", "On Fire", Criterion::DayStreak(3)),
    rule("7-day-streak", "Week Warrior", Criterion::DayStreak(7)),
    rule("14-day-streak", "Fortnight Focus", Criterion::DayStreak(14)),
    rule("30-day-streak", "Monthly Master", Criterion::DayStreak(30)),
    rule("100-points", "Point Collector", Criterion::Points(100)),
    rule("500-points", "Point Hoarder", Criterion::Points(500)),
    rule("1000-points", "Point Legend", Criterion::Points(1000)),
    // Lifetime count, not a calendar week.
    rule("perfect-week", "Perfect Week", Criterion::TasksCompleted(7)),
    rule("challenge-complete", "Challenge Champion", Criterion::AllDailyChallenges),
    rule("speed-demon", "Speed Demon", Criterion::SpeedChallenges(5)),
    rule("1-hour-study", "Study Starter", Criterion::StudyMinutes(60)),
    rule("5-hour-study", "Dedicated Learner", Criterion::StudyMinutes(300)),
    rule("10-hour-study", "Study Marathon", Criterion::StudyMinutes(600)),
];

pub fn find(id: &str) -> Option<&'static MedalRule> {
    MEDAL_RULES.iter().find(|r| r.id == id)
}

/// Unknown ids are never unlocked.
pub fn is_unlocked(profile: &Profile, id: &str) -> bool {
    find(id).is_some() && profile.unlocked_medals.contains(id)
}

/// Unlock every satisfied medal; returns the newly unlocked ids in order.
pub fn evaluate(profile: &mut Profile, today: NaiveDate, events: &mut Vec<Event>) -> Vec<String> {
    let mut unlocked = Vec::new();

    loop {
        let ctx = MedalContext::from_profile(profile, today);
        let due: Vec<&MedalRule> = MEDAL_RULES
            .iter()
            .filter(|r| !profile.unlocked_medals.contains(r.id) && r.criterion.is_met(&ctx))
            .collect();
        if due.is_empty() {
            break;
        }

        for rule in due {
            profile.unlocked_medals.insert(rule.id);
            profile.points = profile.points.saturating_add(MEDAL_BONUS_POINTS);
            tracing::info!(medal = rule.id, "medal unlocked");
            events.push(Event::MedalUnlocked {
                medal_id: rule.id.to_string(),
                bonus: MEDAL_BONUS_POINTS,
            });
            unlocked.push(rule.id.to_string());
        }
    }

    unlocked
}

/// Render-friendly medal listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalStatus {
    pub id: String,
    pub name: String,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalView {
    pub unlocked_count: usize,
    pub total: usize,
    pub medals: Vec<MedalStatus>,
}

impl MedalView {
    pub fn for_profile(profile: &Profile) -> Self {
        let medals: Vec<MedalStatus> = MEDAL_RULES
            .iter()
            .map(|r| MedalStatus {
                id: r.id.to_string(),
                name: r.name.to_string(),
                unlocked: profile.unlocked_medals.contains(r.id),
            })
            .collect();
        Self {
            unlocked_count: medals.iter().filter(|m| m.unlocked).count(),
            total: medals.len(),
            medals,
        }
    }
}
