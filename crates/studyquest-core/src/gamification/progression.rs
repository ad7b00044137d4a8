//! Experience, levels and level rewards.
//!
//! ## Curve
//!
//! ```text
//! xp_required_for_level(L) = floor(100 * 1.5^(L-1))
//! L1: 100, L2: 150, L3: 225, L4: 337, L5: 506, ...
//! ```
//!
//! XP is banked toward the next level. An award that crosses several
//! thresholds levels up several times, and each level crossed is checked
//! against the reward table.

use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::gamification::combo::Multiplier;
use crate::profile::Profile;

const BASE_LEVEL_XP: f64 = 100.0;
const LEVEL_GROWTH: f64 = 1.5;

/// XP needed to advance from `level` to `level + 1`.
pub fn xp_required_for_level(level: u32) -> u64 {
    let exponent = i32::try_from(level.saturating_sub(1)).unwrap_or(i32::MAX);
    let required = (BASE_LEVEL_XP * LEVEL_GROWTH.powi(exponent)).floor();
    if required >= u64::MAX as f64 {
        u64::MAX
    } else {
        required as u64
    }
}

/// Cosmetic unlock category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Theme,
    Avatar,
    Title,
}

impl RewardKind {
    pub fn label(self) -> &'static str {
        match self {
            RewardKind::Theme => "theme",
            RewardKind::Avatar => "avatar",
            RewardKind::Title => "title",
        }
    }
}

/// A single unlocked cosmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub kind: RewardKind,
    pub name: String,
}

/// Row of the level reward table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelReward {
    pub level: u32,
    pub theme: Option<&'static str>,
    pub avatar: Option<&'static str>,
    pub title: Option<&'static str>,
}

impl LevelReward {
    fn rewards(&self) -> impl Iterator<Item = (RewardKind, &'static str)> {
        [
            (RewardKind::Theme, self.theme),
            (RewardKind::Avatar, self.avatar),
            (RewardKind::Title, self.title),
        ]
        .into_iter()
        .filter_map(|(kind, name)| name.map(|n| (kind, n)))
    }
}

pub const LEVEL_REWARDS: &[LevelReward] = &[
    LevelReward { level: 5, theme: Some("ocean"), avatar: None, title: Some("Apprentice") },
    LevelReward { level: 10, theme: Some("sunset"), avatar: Some("scholar"), title: Some("Scholar") },
    LevelReward { level: 15, theme: Some("forest"), avatar: None, title: Some("Expert") },
    LevelReward { level: 20, theme: Some("midnight"), avatar: Some("genius"), title: Some("Master") },
    LevelReward { level: 25, theme: Some("galaxy"), avatar: None, title: Some("Grandmaster") },
    LevelReward { level: 30, theme: Some("neon"), avatar: Some("legend"), title: Some("Legend") },
];

pub fn rewards_for_level(level: u32) -> Option<&'static LevelReward> {
    LEVEL_REWARDS.iter().find(|r| r.level == level)
}

/// Outcome of one XP award.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub gained: u64,
    /// Every level reached during this award, in order.
    pub levels_gained: Vec<u32>,
    pub rewards: Vec<Reward>,
}

/// Add `floor(base_xp * multiplier)` XP and resolve level-ups.
pub fn award_xp(
    profile: &mut Profile,
    base_xp: u64,
    multiplier: Multiplier,
    events: &mut Vec<Event>,
) -> XpAward {
    let gained = multiplier.apply(base_xp);
    profile.xp = profile.xp.saturating_add(gained);

    let mut award = XpAward {
        gained,
        ..XpAward::default()
    };

    loop {
        let required = xp_required_for_level(profile.level);
        if profile.xp < required {
            break;
        }
        profile.xp -= required;
        profile.level = profile.level.saturating_add(1);
        award.levels_gained.push(profile.level);

        tracing::info!(level = profile.level, "level up");
        events.push(Event::LevelUp {
            level: profile.level,
        });

        award
            .rewards
            .extend(grant_level_rewards(profile, profile.level, events));

        if profile.level == u32::MAX {
            break;
        }
    }

    award
}

/// Unlock whatever the reward table lists for `level` that the profile
/// does not already own.
pub fn grant_level_rewards(profile: &mut Profile, level: u32, events: &mut Vec<Event>) -> Vec<Reward> {
    let Some(entry) = rewards_for_level(level) else {
        return Vec::new();
    };

    let mut granted = Vec::new();
    for (kind, name) in entry.rewards() {
        if profile.unlocks_mut(kind).insert(name) {
            let reward = Reward {
                kind,
                name: name.to_string(),
            };
            events.push(Event::RewardUnlocked {
                reward: reward.clone(),
            });
            granted.push(reward);
        }
    }
    granted
}

/// Add `floor(base_points * multiplier)` points; returns the amount added.
pub fn award_points(profile: &mut Profile, base_points: u64, multiplier: Multiplier) -> u64 {
    let earned = multiplier.apply(base_points);
    profile.points = profile.points.saturating_add(earned);
    earned
}
