//! Event pipeline.
//!
//! Pure functions over a [`Profile`] that run the gamification stages in
//! their fixed order:
//!
//! ```text
//! task completed:  combo -> points/xp -> weekly goal -> challenges -> records -> medals
//! study logged:    study time -> focus challenge -> timer bonus -> records -> medals
//! tick:            daily reset -> weekly refresh -> combo expiry
//! ```
//!
//! Nothing here does I/O; the engine loads, calls one of these, and saves.
//! Every day, week and combo boundary is taken from the `now` the caller
//! passes in, never from timestamps carried by the input.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::events::Event;
use crate::gamification::challenges::{self, ChallengeUpdate};
use crate::gamification::combo::{Multiplier, COMBO_WINDOW_MINUTES};
use crate::gamification::medals;
use crate::gamification::progression::{self, Reward};
use crate::gamification::records;
use crate::gamification::weekly_goal::{self, DEFAULT_WEEKLY_TARGET};
use crate::profile::Profile;
use crate::task::CompletedTask;

/// Points paid for finishing a timed study session.
pub const TIMER_COMPLETION_POINTS: u64 = 20;

/// Tunables that are not part of the stored profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub combo_window: Duration,
    /// Target applied to newly created profiles.
    pub weekly_goal_target: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            combo_window: Duration::minutes(COMBO_WINDOW_MINUTES),
            weekly_goal_target: DEFAULT_WEEKLY_TARGET,
        }
    }
}

/// Everything a single task completion produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutcome {
    pub points_awarded: u64,
    pub xp_awarded: u64,
    /// Challenge and medal bonus points paid by this completion.
    pub bonus_points: u64,
    pub combo: u32,
    pub multiplier: Multiplier,
    pub newly_unlocked_medals: Vec<String>,
    pub newly_unlocked_rewards: Vec<Reward>,
    pub challenge_updates: Vec<ChallengeUpdate>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyOutcome {
    pub minutes: u32,
    pub points_awarded: u64,
    pub challenge_updates: Vec<ChallengeUpdate>,
    pub newly_unlocked_medals: Vec<String>,
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub combo_expired: bool,
    pub challenges_reset: bool,
    pub week_reset: bool,
    pub events: Vec<Event>,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        self.combo_expired || self.challenges_reset || self.week_reset
    }
}

/// When a completion counts for the time-of-day challenges. A stamp from
/// another day, or from the future, counts as `now`.
fn effective_completion_time(task: &CompletedTask, now: Timestamp) -> Timestamp {
    let stamped = task.completed_at;
    if stamped <= now && stamped.date_naive() == now.date_naive() {
        stamped
    } else {
        now
    }
}

/// Run every stage for one task completion reported at `now`.
pub fn complete_task(
    profile: &mut Profile,
    task: &CompletedTask,
    now: Timestamp,
    config: &GameConfig,
) -> TaskOutcome {
    let mut events = Vec::new();
    let today = now.date_naive();

    profile.challenge_state.ensure_current(today, &mut events);
    profile.completed_tasks_count = profile.completed_tasks_count.saturating_add(1);

    let advance = profile.combo.advance(now, config.combo_window, &mut events);
    let multiplier = advance.applied_multiplier();
    let base = task.priority.base_points();

    let points_awarded = progression::award_points(profile, base, multiplier);
    // Task XP is announced before any level-ups it causes.
    let mut stage_events = Vec::new();
    let xp = progression::award_xp(profile, base, multiplier, &mut stage_events);
    events.push(Event::TaskCompleted {
        task_id: task.id.clone(),
        points: points_awarded,
        xp: xp.gained,
        multiplier,
        at: now,
    });
    events.append(&mut stage_events);

    let mut rewards = xp.rewards;
    let points_before_bonuses = profile.points;

    let weekly = weekly_goal::record_completion(profile, today, &mut events);
    if let Some(bonus) = weekly.bonus {
        rewards.extend(bonus.rewards);
    }

    let challenge_updates = challenges::record_task(
        profile,
        task,
        effective_completion_time(task, now),
        &mut events,
    );
    records::record_task(profile, task, &mut events);
    let newly_unlocked_medals = medals::evaluate(profile, today, &mut events);

    tracing::debug!(
        task = %task.id,
        points = points_awarded,
        combo = advance.combo,
        "task completion processed"
    );

    TaskOutcome {
        points_awarded,
        xp_awarded: xp.gained,
        bonus_points: profile.points.saturating_sub(points_before_bonuses),
        combo: advance.combo,
        multiplier,
        newly_unlocked_medals,
        newly_unlocked_rewards: rewards,
        challenge_updates,
        events,
    }
}

/// Record a finished study session of `minutes` on `now`'s date.
///
/// Zero minutes records nothing.
pub fn end_study_session(profile: &mut Profile, minutes: u32, now: Timestamp) -> StudyOutcome {
    let mut events = Vec::new();
    let today = now.date_naive();
    profile.challenge_state.ensure_current(today, &mut events);

    if minutes == 0 {
        return StudyOutcome {
            minutes,
            points_awarded: 0,
            challenge_updates: Vec::new(),
            newly_unlocked_medals: Vec::new(),
            events,
        };
    }

    profile.study_time.record(today, minutes);
    let focus = challenges::record_study(profile, minutes, &mut events);

    profile.points = profile.points.saturating_add(TIMER_COMPLETION_POINTS);
    events.push(Event::TimerFinished {
        minutes,
        points: TIMER_COMPLETION_POINTS,
    });

    records::record_study(profile);
    let newly_unlocked_medals = medals::evaluate(profile, today, &mut events);

    StudyOutcome {
        minutes,
        points_awarded: TIMER_COMPLETION_POINTS,
        challenge_updates: vec![focus],
        newly_unlocked_medals,
        events,
    }
}

/// Set the externally maintained day streak.
pub fn change_day_streak(profile: &mut Profile, streak: u32, today: NaiveDate) -> Vec<Event> {
    let mut events = Vec::new();
    profile.streak = streak;
    records::record_streak(profile);
    medals::evaluate(profile, today, &mut events);
    events
}

/// Time-driven housekeeping: daily reset, weekly refresh and combo expiry.
pub fn refresh(profile: &mut Profile, now: Timestamp, config: &GameConfig) -> TickOutcome {
    let mut events = Vec::new();
    let today = now.date_naive();

    let challenges_reset = profile.challenge_state.ensure_current(today, &mut events);
    let week_reset = profile.weekly_goal.refresh(today);
    let combo_expired = profile
        .combo
        .expire_if_stale(now, config.combo_window, &mut events);

    TickOutcome {
        combo_expired,
        challenges_reset,
        week_reset,
        events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::challenges::{ChallengeKind, ChallengeState};
    use crate::task::Priority;
    use chrono::DateTime;

    fn at(s: &str) -> Timestamp {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn task(id: &str, priority: Priority, when: &str) -> CompletedTask {
        CompletedTask::new(id, priority, at(when))
    }

    #[test]
    fn test_first_high_task() {
        let mut profile = Profile::default();
        let out = complete_task(
            &mut profile,
            &task("t1", Priority::High, "2026-10-19T10:00:00+00:00"),
            at("2026-10-19T10:00:00+00:00"),
            &GameConfig::default(),
        );
        assert_eq!(out.points_awarded, 50);
        assert_eq!(out.xp_awarded, 50);
        assert_eq!(out.combo, 1);
        assert_eq!(out.multiplier, Multiplier::BASE);
        // priority +40, first-task +100, 100-points +100
        assert_eq!(out.bonus_points, 240);
        assert_eq!(profile.points, 290);
        assert_eq!(out.newly_unlocked_medals, vec!["first-task", "100-points"]);
        assert!(matches!(out.events.first(), Some(Event::ChallengesReset { .. })));
        assert!(out
            .challenge_updates
            .iter()
            .any(|u| u.challenge == ChallengeKind::Priority && u.completed_now));
    }

    #[test]
    fn test_task_event_precedes_level_up() {
        let mut profile = Profile {
            xp: 90,
            challenge_state: ChallengeState::fresh("2026-10-19".parse().unwrap()),
            ..Profile::default()
        };
        let out = complete_task(
            &mut profile,
            &task("t1", Priority::Low, "2026-10-19T10:00:00+00:00"),
            at("2026-10-19T10:00:00+00:00"),
            &GameConfig::default(),
        );
        let kinds: Vec<&str> = out
            .events
            .iter()
            .map(|e| match e {
                Event::TaskCompleted { .. } => "task",
                Event::LevelUp { .. } => "level",
                _ => "other",
            })
            .filter(|k| *k != "other")
            .collect();
        assert_eq!(kinds, vec!["task", "level"]);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.xp, 5);
    }

    #[test]
    fn test_stamp_from_yesterday_keeps_today_board() {
        let mut profile = Profile::default();
        let config = GameConfig::default();
        let now = at("2026-10-20T10:00:00+00:00");
        complete_task(&mut profile, &task("a", Priority::High, "2026-10-20T10:00:00+00:00"), now, &config);

        let late = task("b", Priority::Low, "2026-10-19T23:00:00+00:00");
        let out = complete_task(&mut profile, &late, now, &config);
        assert!(!out.events.iter().any(|e| matches!(e, Event::ChallengesReset { .. })));
        assert_eq!(profile.challenge_state.last_reset_date, Some("2026-10-20".parse().unwrap()));
        assert!(profile.challenge_state.priority.completed);
        assert_eq!(profile.challenge_state.daily_goal.count, 2);
        assert_eq!(profile.combo.last_task_time, Some(now));
        assert_eq!(out.combo, 2);
    }

    #[test]
    fn test_effective_completion_time() {
        let now = at("2026-10-20T10:00:00+00:00");
        let early = task("a", Priority::Low, "2026-10-20T08:00:00+00:00");
        assert_eq!(effective_completion_time(&early, now), early.completed_at);
        let yesterday = task("b", Priority::Low, "2026-10-19T08:00:00+00:00");
        assert_eq!(effective_completion_time(&yesterday, now), now);
        let future = task("c", Priority::Low, "2026-10-20T11:00:00+00:00");
        assert_eq!(effective_completion_time(&future, now), now);
    }

    #[test]
    fn test_study_session() {
        let mut profile = Profile::default();
        let out = end_study_session(&mut profile, 30, at("2026-10-19T18:00:00+00:00"));
        assert_eq!(out.points_awarded, TIMER_COMPLETION_POINTS);
        assert!(out.challenge_updates[0].completed_now);
        assert_eq!(profile.study_time.total_minutes, 30);
        assert_eq!(profile.personal_records.total_study_time, 30);
        // focus +25, timer +20
        assert_eq!(profile.points, 45);
    }

    #[test]
    fn test_zero_minute_session_records_nothing() {
        let mut profile = Profile::default();
        let out = end_study_session(&mut profile, 0, at("2026-10-19T18:00:00+00:00"));
        assert_eq!(out.points_awarded, 0);
        assert_eq!(profile.points, 0);
        assert_eq!(profile.study_time.total_minutes, 0);
    }

    #[test]
    fn test_refresh_expires_combo_and_resets_day() {
        let mut profile = Profile::default();
        let config = GameConfig::default();
        let done = task("a", Priority::Low, "2026-10-19T23:50:00+00:00");
        complete_task(&mut profile, &done, done.completed_at, &config);

        let out = refresh(&mut profile, at("2026-10-19T23:55:00+00:00"), &config);
        assert!(!out.changed());

        let out = refresh(&mut profile, at("2026-10-20T00:30:00+00:00"), &config);
        assert!(out.combo_expired);
        assert!(out.challenges_reset);
        assert_eq!(profile.combo.combo, 0);
        assert_eq!(profile.challenge_state.daily_goal.count, 0);
    }

    #[test]
    fn test_streak_change_unlocks_medal() {
        let mut profile = Profile::default();
        let events = change_day_streak(&mut profile, 3, "2026-10-19".parse().unwrap());
        assert!(profile.unlocked_medals.contains("3-day-streak"));
        assert_eq!(profile.best_streak, 3);
        // The medal bonus alone reaches the first points medal.
        assert!(profile.unlocked_medals.contains("100-points"));
        assert_eq!(events.len(), 2);
    }
}
