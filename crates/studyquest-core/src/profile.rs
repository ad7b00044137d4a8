//! Per-user profile aggregate.
//!
//! A `Profile` is the whole persisted state of one user. Engine stages take
//! `&mut Profile` and mutate it in place; nothing lives in process-wide state.
//!
//! Every field has a serde default, so records written by older versions (or
//! hand-edited ones) load with missing fields filled in. [`Profile::repair`]
//! then restores the invariants that serde alone cannot express.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::Timestamp;
use crate::error::ValidationError;
use crate::gamification::challenges::ChallengeState;
use crate::gamification::combo::{ComboState, Multiplier};
use crate::gamification::progression::{self, RewardKind};
use crate::gamification::records::PersonalRecords;
use crate::gamification::weekly_goal::WeeklyGoal;

pub const DEFAULT_THEMES: [&str; 2] = ["light", "dark"];
pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_AVATAR: &str = "default";
pub const DEFAULT_TITLE: &str = "Rookie";

/// Ordered, duplicate-free, grow-only set of unlocked item names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Unlocks(Vec<String>);

impl Unlocks {
    pub fn seeded(items: &[&str]) -> Self {
        let mut unlocks = Self::default();
        for item in items {
            unlocks.insert(*item);
        }
        unlocks
    }

    pub fn contains(&self, item: &str) -> bool {
        self.0.iter().any(|i| i == item)
    }

    /// Returns true when `item` was not present before.
    pub fn insert(&mut self, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.contains(&item) {
            return false;
        }
        self.0.push(item);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn dedup(&mut self) -> bool {
        let before = self.0.len();
        let mut seen = Vec::with_capacity(before);
        self.0.retain(|item| {
            if seen.contains(item) {
                false
            } else {
                seen.push(item.clone());
                true
            }
        });
        self.0.len() != before
    }
}

/// Lifetime and per-day study minutes reported by the timer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyTime {
    pub total_minutes: u64,
    pub daily_minutes: BTreeMap<NaiveDate, u32>,
}

impl StudyTime {
    pub fn record(&mut self, date: NaiveDate, minutes: u32) {
        self.total_minutes = self.total_minutes.saturating_add(u64::from(minutes));
        let day = self.daily_minutes.entry(date).or_default();
        *day = day.saturating_add(minutes);
    }

    pub fn minutes_on(&self, date: NaiveDate) -> u32 {
        self.daily_minutes.get(&date).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub points: u64,
    pub level: u32,
    pub xp: u64,
    #[serde(flatten)]
    pub combo: ComboState,
    #[serde(alias = "completedCount")]
    pub completed_tasks_count: u64,
    pub streak: u32,
    pub best_streak: u32,
    pub weekly_goal: WeeklyGoal,
    pub personal_records: PersonalRecords,
    pub unlocked_themes: Unlocks,
    pub unlocked_avatars: Unlocks,
    pub titles: Unlocks,
    pub selected_theme: String,
    pub selected_avatar: String,
    pub selected_title: String,
    #[serde(alias = "medals")]
    pub unlocked_medals: Unlocks,
    pub challenge_state: ChallengeState,
    pub speed_challenges_completed: u32,
    pub study_time: StudyTime,
    pub created_at: Option<Timestamp>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            xp: 0,
            combo: ComboState::default(),
            completed_tasks_count: 0,
            streak: 0,
            best_streak: 0,
            weekly_goal: WeeklyGoal::default(),
            personal_records: PersonalRecords::default(),
            unlocked_themes: Unlocks::seeded(&DEFAULT_THEMES),
            unlocked_avatars: Unlocks::seeded(&[DEFAULT_AVATAR]),
            titles: Unlocks::seeded(&[DEFAULT_TITLE]),
            selected_theme: DEFAULT_THEME.to_string(),
            selected_avatar: DEFAULT_AVATAR.to_string(),
            selected_title: DEFAULT_TITLE.to_string(),
            unlocked_medals: Unlocks::default(),
            challenge_state: ChallengeState::default(),
            speed_challenges_completed: 0,
            study_time: StudyTime::default(),
            created_at: None,
        }
    }
}

impl Profile {
    /// Fresh profile for a newly created account.
    pub fn new(created_at: Timestamp, weekly_goal_target: u32) -> Self {
        let mut profile = Self {
            created_at: Some(created_at),
            ..Self::default()
        };
        profile.weekly_goal.target = weekly_goal_target.max(1);
        profile
    }

    /// XP still needed to reach the next level.
    pub fn xp_to_next(&self) -> u64 {
        progression::xp_required_for_level(self.level).saturating_sub(self.xp)
    }

    pub fn unlocks(&self, kind: RewardKind) -> &Unlocks {
        match kind {
            RewardKind::Theme => &self.unlocked_themes,
            RewardKind::Avatar => &self.unlocked_avatars,
            RewardKind::Title => &self.titles,
        }
    }

    pub fn unlocks_mut(&mut self, kind: RewardKind) -> &mut Unlocks {
        match kind {
            RewardKind::Theme => &mut self.unlocked_themes,
            RewardKind::Avatar => &mut self.unlocked_avatars,
            RewardKind::Title => &mut self.titles,
        }
    }

    pub fn selected(&self, kind: RewardKind) -> &str {
        match kind {
            RewardKind::Theme => &self.selected_theme,
            RewardKind::Avatar => &self.selected_avatar,
            RewardKind::Title => &self.selected_title,
        }
    }

    fn selected_mut(&mut self, kind: RewardKind) -> &mut String {
        match kind {
            RewardKind::Theme => &mut self.selected_theme,
            RewardKind::Avatar => &mut self.selected_avatar,
            RewardKind::Title => &mut self.selected_title,
        }
    }

    /// Select an unlocked theme, avatar or title.
    ///
    /// # Errors
    /// Returns [`ValidationError::NotUnlocked`] and leaves the profile
    /// untouched when `item` is not in the matching unlocked set.
    pub fn select(&mut self, kind: RewardKind, item: &str) -> Result<(), ValidationError> {
        if !self.unlocks(kind).contains(item) {
            return Err(ValidationError::NotUnlocked {
                kind: kind.label().to_string(),
                item: item.to_string(),
            });
        }
        *self.selected_mut(kind) = item.to_string();
        Ok(())
    }

    pub fn select_theme(&mut self, theme: &str) -> Result<(), ValidationError> {
        self.select(RewardKind::Theme, theme)
    }

    pub fn select_avatar(&mut self, avatar: &str) -> Result<(), ValidationError> {
        self.select(RewardKind::Avatar, avatar)
    }

    pub fn select_title(&mut self, title: &str) -> Result<(), ValidationError> {
        self.select(RewardKind::Title, title)
    }

    /// Restore invariants on a profile loaded from storage.
    ///
    /// Returns true if anything had to change.
    pub fn repair(&mut self) -> bool {
        let before = self.clone();

        self.level = self.level.max(1);
        if self.weekly_goal.target == 0 {
            self.weekly_goal.target = WeeklyGoal::default().target;
        }

        for theme in DEFAULT_THEMES {
            self.unlocked_themes.insert(theme);
        }
        self.unlocked_avatars.insert(DEFAULT_AVATAR);
        self.titles.insert(DEFAULT_TITLE);
        self.unlocked_themes.dedup();
        self.unlocked_avatars.dedup();
        self.titles.dedup();
        self.unlocked_medals.dedup();

        for (kind, fallback) in [
            (RewardKind::Theme, DEFAULT_THEME),
            (RewardKind::Avatar, DEFAULT_AVATAR),
            (RewardKind::Title, DEFAULT_TITLE),
        ] {
            if !self.unlocks(kind).contains(self.selected(kind)) {
                *self.selected_mut(kind) = fallback.to_string();
            }
        }

        // Drain XP left over the threshold; level rewards are granted
        // silently since these level-ups happened in an earlier session.
        progression::award_xp(self, 0, Multiplier::BASE, &mut Vec::new());

        self.best_streak = self.best_streak.max(self.streak);

        let changed = *self != before;
        if changed {
            tracing::warn!("repaired inconsistent profile state");
        }
        changed
    }
}

/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp, or a `Mon Oct 19 2026`
/// style date string. Anything else reads as `None`.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
        .or_else(|| NaiveDate::parse_from_str(raw, "%a %b %d %Y").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    #[test]
    fn test_default_profile_is_seeded() {
        let profile = Profile::default();
        assert_eq!(profile.level, 1);
        assert!(profile.unlocked_themes.contains("light"));
        assert!(profile.unlocked_themes.contains("dark"));
        assert!(profile.unlocked_avatars.contains("default"));
        assert!(profile.titles.contains("Rookie"));
        assert_eq!(profile.weekly_goal.target, 10);
        assert_eq!(profile.xp_to_next(), 100);
    }

    #[test]
    fn test_select_locked_is_noop() {
        let mut profile = Profile::default();
        let before = profile.clone();
        let err = profile.select_avatar("legend").unwrap_err();
        assert!(matches!(err, ValidationError::NotUnlocked { .. }));
        assert_eq!(profile, before);
    }

    #[test]
    fn test_select_unlocked() {
        let mut profile = Profile::default();
        profile.unlocked_avatars.insert("scholar");
        profile.select_avatar("scholar").unwrap();
        assert_eq!(profile.selected_avatar, "scholar");
        profile.select_theme("dark").unwrap();
        assert_eq!(profile.selected_theme, "dark");
    }

    #[test]
    fn test_missing_fields_load_as_defaults() {
        let profile: Profile = serde_json::from_str(r#"{"points": 120, "completedCount": 4}"#).unwrap();
        assert_eq!(profile.points, 120);
        assert_eq!(profile.completed_tasks_count, 4);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.selected_title, "Rookie");
        assert!(profile.unlocked_medals.is_empty());
    }

    #[test]
    fn test_legacy_fields() {
        let json = r#"{
            "medals": ["first-task"],
            "combo": 2,
            "lastTaskTime": "2026-10-19T10:00:00+00:00",
            "weeklyGoal": {"target": 10, "completed": 3, "startDate": "2026-10-19T08:12:00.000Z"}
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert!(profile.unlocked_medals.contains("first-task"));
        assert_eq!(profile.combo.combo, 2);
        assert!(profile.combo.last_task_time.is_some());
        assert_eq!(
            profile.weekly_goal.week_start,
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );
    }

    #[test]
    fn test_repair_restores_invariants() {
        let mut profile = Profile {
            level: 0,
            xp: 260,
            selected_avatar: "ghost".into(),
            unlocked_avatars: Unlocks::default(),
            ..Profile::default()
        };
        assert!(profile.repair());
        assert_eq!(profile.level, 3);
        assert_eq!(profile.xp, 10);
        assert_eq!(profile.selected_avatar, "default");
        assert!(profile.unlocked_avatars.contains("default"));
        assert!(!profile.repair());
    }

    #[test]
    fn test_round_trip_uses_camel_case() {
        let mut profile = Profile::new(
            DateTime::parse_from_rfc3339("2026-10-19T10:00:00+00:00").unwrap(),
            12,
        );
        profile.completed_tasks_count = 2;
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["completedTasksCount"], 2);
        assert_eq!(json["weeklyGoal"]["target"], 12);
        assert_eq!(json["combo"], 0);
        let back: Profile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }

    #[test]
    fn test_study_time_record() {
        let mut study = StudyTime::default();
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        study.record(day, 25);
        study.record(day, 10);
        assert_eq!(study.total_minutes, 35);
        assert_eq!(study.minutes_on(day), 35);
    }
}
