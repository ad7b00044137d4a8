//! Consecutive-completion combo with a decay window.
//!
//! Each completion inside the window extends the chain; a completion after
//! the window starts a new chain at 1. An idle tick drops a stale chain to 0.
//! The multiplier tier is a pure function of the chain length.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::events::Event;

/// Default gap allowed between two completions of one chain.
pub const COMBO_WINDOW_MINUTES: i64 = 30;

/// Chain lengths that announce a new tier.
pub const COMBO_MILESTONES: [u32; 3] = [3, 5, 10];

/// Award multiplier, stored in tenths so applying it stays in integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct Multiplier(u32);

impl Multiplier {
    /// No bonus.
    pub const BASE: Self = Self(10);

    /// Tier for a chain of `combo` completions.
    pub fn for_combo(combo: u32) -> Self {
        if combo >= 10 {
            Self(40)
        } else if combo >= 5 {
            Self(30)
        } else if combo >= 3 {
            Self(20)
        } else if combo >= 1 {
            Self(15)
        } else {
            Self::BASE
        }
    }

    pub fn tenths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// `floor(base * multiplier)`.
    pub fn apply(self, base: u64) -> u64 {
        base.saturating_mul(u64::from(self.0)) / 10
    }

    pub fn is_bonus(self) -> bool {
        self.0 > Self::BASE.0
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Self::BASE
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 10 == 0 {
            write!(f, "{}x", self.0 / 10)
        } else {
            write!(f, "{}.{}x", self.0 / 10, self.0 % 10)
        }
    }
}

impl From<Multiplier> for f64 {
    fn from(m: Multiplier) -> Self {
        m.as_f64()
    }
}

impl TryFrom<f64> for Multiplier {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 1.0 {
            return Err(format!("multiplier must be a finite value >= 1, got {value}"));
        }
        Ok(Self((value * 10.0).round() as u32))
    }
}

/// Persisted combo counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComboState {
    pub combo: u32,
    pub last_task_time: Option<Timestamp>,
}

/// Result of advancing the combo for one completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboAdvance {
    /// Chain length after the completion.
    pub combo: u32,
    /// Whether the completion extended a live chain.
    pub chained: bool,
    /// Set when the chain just reached one of [`COMBO_MILESTONES`].
    pub milestone: Option<u32>,
}

impl ComboAdvance {
    /// Multiplier paid on this completion. A completion that opens a new
    /// chain earns the base rate; later links earn the tier they reach.
    pub fn applied_multiplier(&self) -> Multiplier {
        if self.chained {
            Multiplier::for_combo(self.combo)
        } else {
            Multiplier::BASE
        }
    }
}

impl ComboState {
    /// Tier of the current chain.
    pub fn multiplier(&self) -> Multiplier {
        Multiplier::for_combo(self.combo)
    }

    /// Advance on a completion at `now`.
    pub fn advance(&mut self, now: Timestamp, window: Duration, events: &mut Vec<Event>) -> ComboAdvance {
        let chained = self
            .last_task_time
            .is_some_and(|last| now.signed_duration_since(last) < window);

        self.combo = if chained { self.combo.saturating_add(1) } else { 1 };
        self.last_task_time = Some(now);

        let milestone = (chained && COMBO_MILESTONES.contains(&self.combo)).then_some(self.combo);
        if let Some(combo) = milestone {
            tracing::debug!(combo, "combo milestone reached");
            events.push(Event::ComboMilestone {
                combo,
                multiplier: Multiplier::for_combo(combo),
            });
        }

        ComboAdvance {
            combo: self.combo,
            chained,
            milestone,
        }
    }

    /// Drop a chain that has been idle for at least `window`.
    ///
    /// Leaves `last_task_time` untouched. Returns true when the combo was reset.
    pub fn expire_if_stale(&mut self, now: Timestamp, window: Duration, events: &mut Vec<Event>) -> bool {
        let Some(last) = self.last_task_time else {
            return false;
        };
        if self.combo == 0 || now.signed_duration_since(last) < window {
            return false;
        }

        let lost = self.combo;
        self.combo = 0;
        tracing::debug!(lost, "combo expired");
        events.push(Event::ComboExpired { combo: lost, at: now });
        true
    }
}
