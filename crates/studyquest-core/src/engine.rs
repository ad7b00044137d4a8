//! Engine facade.
//!
//! Binds a [`ProfileStore`], a [`Clock`] and a [`Notifier`] to one user.
//! Every operation loads the user's profile, repairs it, runs the matching
//! pipeline function, writes the profile back and then forwards the
//! resulting events to the notifier.
//!
//! Read accessors also apply the daily challenge reset, the weekly refresh
//! and combo expiry, and persist the profile when that changed anything.

use serde::{Deserialize, Serialize};

use crate::account;
use crate::clock::{Clock, Timestamp};
use crate::error::{Result, ValidationError};
use crate::events::{Event, Notifier};
use crate::gamification::challenges::ChallengeState;
use crate::gamification::combo::Multiplier;
use crate::gamification::medals::MedalView;
use crate::gamification::pipeline::{self, GameConfig, StudyOutcome, TaskOutcome, TickOutcome};
use crate::gamification::progression::{xp_required_for_level, RewardKind};
use crate::gamification::weekly_goal::WeeklyGoal;
use crate::leaderboard::Leaderboard;
use crate::profile::Profile;
use crate::report::WeeklyReport;
use crate::storage::ProfileStore;
use crate::task::CompletedTask;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComboView {
    pub combo: u32,
    pub multiplier: Multiplier,
    pub last_task_time: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionView {
    pub level: u32,
    pub xp: u64,
    pub xp_required: u64,
    pub xp_to_next: u64,
    pub points: u64,
}

struct Loaded {
    profile: Profile,
    exists: bool,
    repaired: bool,
}

pub struct Engine<S, C, N> {
    store: S,
    clock: C,
    notifier: N,
    config: GameConfig,
    user: String,
}

impl<S: ProfileStore, C: Clock, N: Notifier> Engine<S, C, N> {
    pub fn new(store: S, clock: C, notifier: N, user: impl Into<String>) -> Self {
        Self {
            store,
            clock,
            notifier,
            config: GameConfig::default(),
            user: user.into(),
        }
    }

    pub fn with_config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn load(&self, now: Timestamp) -> Result<Loaded> {
        match self.store.get(&self.user)? {
            Some(mut profile) => {
                let repaired = profile.repair();
                Ok(Loaded {
                    profile,
                    exists: true,
                    repaired,
                })
            }
            None => Ok(Loaded {
                profile: Profile::new(now, self.config.weekly_goal_target),
                exists: false,
                repaired: false,
            }),
        }
    }

    fn save(&mut self, profile: &Profile) -> Result<()> {
        self.store.put(&self.user, profile)
    }

    /// Forward events to the notifier. Called only after a successful save.
    fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            tracing::debug!(user = %self.user, ?event, "event");
            self.notifier.notify(&event.message());
        }
    }

    /// Load, refresh and persist if the refresh changed anything.
    fn refreshed(&mut self) -> Result<(Profile, TickOutcome)> {
        let now = self.clock.now();
        let Loaded {
            mut profile,
            exists,
            repaired,
        } = self.load(now)?;

        let outcome = pipeline::refresh(&mut profile, now, &self.config);
        // Unknown users stay unknown until something is recorded for them.
        if exists {
            if repaired || outcome.changed() {
                self.save(&profile)?;
            }
            self.dispatch(&outcome.events);
        }
        Ok((profile, outcome))
    }

    // ── Accounts ─────────────────────────────────────────────────────

    /// Store a fresh profile for the engine's user.
    ///
    /// # Errors
    /// Fails if the tag is invalid or already taken.
    pub fn create_profile(&mut self) -> Result<Profile> {
        let tag = account::validate_tag(&self.user)?;
        if self.store.get(&tag)?.is_some() {
            return Err(ValidationError::UserExists(tag).into());
        }
        self.user = tag;
        let profile = Profile::new(self.clock.now(), self.config.weekly_goal_target);
        self.save(&profile)?;
        tracing::info!(user = %self.user, "profile created");
        Ok(profile)
    }

    /// Current profile, refreshed.
    pub fn profile(&mut self) -> Result<Profile> {
        Ok(self.refreshed()?.0)
    }

    // ── Events ───────────────────────────────────────────────────────

    pub fn on_task_completed(&mut self, task: &CompletedTask) -> Result<TaskOutcome> {
        let now = self.clock.now();
        let Loaded { mut profile, .. } = self.load(now)?;
        let outcome = pipeline::complete_task(&mut profile, task, now, &self.config);
        self.save(&profile)?;
        self.dispatch(&outcome.events);
        Ok(outcome)
    }

    pub fn on_study_session_ended(&mut self, minutes: u32) -> Result<StudyOutcome> {
        let now = self.clock.now();
        let Loaded { mut profile, .. } = self.load(now)?;
        let outcome = pipeline::end_study_session(&mut profile, minutes, now);
        self.save(&profile)?;
        self.dispatch(&outcome.events);
        Ok(outcome)
    }

    pub fn on_day_streak_changed(&mut self, streak: u32) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let Loaded { mut profile, .. } = self.load(now)?;
        let events = pipeline::change_day_streak(&mut profile, streak, now.date_naive());
        self.save(&profile)?;
        self.dispatch(&events);
        Ok(events)
    }

    /// Periodic housekeeping; the host calls this at least once a minute.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        Ok(self.refreshed()?.1)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn get_combo_state(&mut self) -> Result<ComboView> {
        let profile = self.profile()?;
        Ok(ComboView {
            combo: profile.combo.combo,
            multiplier: profile.combo.multiplier(),
            last_task_time: profile.combo.last_task_time,
        })
    }

    pub fn get_progression_state(&mut self) -> Result<ProgressionView> {
        let profile = self.profile()?;
        Ok(ProgressionView {
            level: profile.level,
            xp: profile.xp,
            xp_required: xp_required_for_level(profile.level),
            xp_to_next: profile.xp_to_next(),
            points: profile.points,
        })
    }

    pub fn get_weekly_goal_state(&mut self) -> Result<WeeklyGoal> {
        Ok(self.profile()?.weekly_goal)
    }

    pub fn get_challenge_state(&mut self) -> Result<ChallengeState> {
        Ok(self.profile()?.challenge_state)
    }

    pub fn get_medal_state(&mut self) -> Result<MedalView> {
        Ok(MedalView::for_profile(&self.profile()?))
    }

    pub fn weekly_report(&mut self) -> Result<WeeklyReport> {
        let profile = self.profile()?;
        Ok(WeeklyReport::for_profile(&profile, self.clock.now().date_naive()))
    }

    pub fn leaderboard(&self) -> Result<Leaderboard> {
        Leaderboard::build(&self.store, &self.user)
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Select an unlocked cosmetic. A locked item or an unknown user is
    /// rejected and nothing is written.
    pub fn select(&mut self, kind: RewardKind, item: &str) -> Result<()> {
        let Loaded {
            mut profile,
            exists,
            ..
        } = self.load(self.clock.now())?;
        if !exists {
            return Err(ValidationError::UnknownUser(self.user.clone()).into());
        }
        profile.select(kind, item)?;
        self.save(&profile)
    }

    pub fn select_avatar(&mut self, avatar: &str) -> Result<()> {
        self.select(RewardKind::Avatar, avatar)
    }

    pub fn select_title(&mut self, title: &str) -> Result<()> {
        self.select(RewardKind::Title, title)
    }

    pub fn select_theme(&mut self, theme: &str) -> Result<()> {
        self.select(RewardKind::Theme, theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::error::CoreError;
    use crate::events::CollectingNotifier;
    use crate::storage::MemoryProfileStore;
    use crate::task::Priority;

    type TestEngine = Engine<MemoryProfileStore, ManualClock, CollectingNotifier>;

    fn engine(now: &str) -> TestEngine {
        Engine::new(
            MemoryProfileStore::new(),
            ManualClock::parse(now).unwrap(),
            CollectingNotifier::default(),
            "Owl#1234",
        )
    }

    fn task_now(engine: &TestEngine, id: &str, priority: Priority) -> CompletedTask {
        CompletedTask::new(id, priority, engine.now())
    }

    #[test]
    fn test_create_profile_rejects_duplicate() {
        let mut engine = engine("2026-10-19T10:00:00+00:00");
        engine.create_profile().unwrap();
        let err = engine.create_profile().unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UserExists(_))
        ));
    }

    #[test]
    fn test_create_profile_rejects_short_tag() {
        let mut engine = Engine::new(
            MemoryProfileStore::new(),
            ManualClock::parse("2026-10-19T10:00:00+00:00").unwrap(),
            CollectingNotifier::default(),
            "ab",
        );
        assert!(matches!(
            engine.create_profile(),
            Err(CoreError::Validation(ValidationError::InvalidTag { .. }))
        ));
    }

    #[test]
    fn test_task_completion_persists_and_notifies() {
        let mut engine = engine("2026-10-19T10:00:00+00:00");
        let task = task_now(&engine, "t1", Priority::Medium);
        let outcome = engine.on_task_completed(&task).unwrap();
        assert_eq!(outcome.points_awarded, 25);

        let stored = engine.store().get("Owl#1234").unwrap().unwrap();
        assert_eq!(stored.completed_tasks_count, 1);
        assert!(engine
            .notifier()
            .messages
            .iter()
            .any(|m| m == "Task completed! +25 points, +25 XP"));
    }

    #[test]
    fn test_reads_do_not_create_unknown_users() {
        let mut engine = engine("2026-10-19T10:00:00+00:00");
        let progress = engine.get_progression_state().unwrap();
        assert_eq!(progress.level, 1);
        assert_eq!(progress.xp_to_next, 100);
        assert!(engine.store().users().unwrap().is_empty());
        assert!(engine.notifier().messages.is_empty());
    }

    #[test]
    fn test_locked_selection_writes_nothing() {
        let mut engine = engine("2026-10-19T10:00:00+00:00");
        engine.create_profile().unwrap();
        let before = engine.store().get("Owl#1234").unwrap();

        let err = engine.select_avatar("legend").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::NotUnlocked { .. })
        ));
        assert_eq!(engine.store().get("Owl#1234").unwrap(), before);

        engine.select_theme("dark").unwrap();
        assert_eq!(engine.profile().unwrap().selected_theme, "dark");
    }

    #[test]
    fn test_select_for_unknown_user_creates_no_row() {
        let mut engine = engine("2026-10-19T10:00:00+00:00");
        let err = engine.select_theme("dark").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::UnknownUser(ref tag)) if tag == "Owl#1234"
        ));
        assert!(engine.store().users().unwrap().is_empty());
    }

    #[test]
    fn test_tick_expires_combo() {
        let mut engine = engine("2026-10-19T10:00:00+00:00");
        let task = task_now(&engine, "t1", Priority::Low);
        engine.on_task_completed(&task).unwrap();

        engine.clock().advance(chrono::Duration::minutes(29));
        assert!(!engine.tick().unwrap().combo_expired);

        engine.clock().advance(chrono::Duration::minutes(1));
        assert!(engine.tick().unwrap().combo_expired);
        assert_eq!(engine.get_combo_state().unwrap().combo, 0);
    }
}
