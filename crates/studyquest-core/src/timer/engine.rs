//! Study timer implementation.
//!
//! The study timer is a wall-clock-based countdown. It does not use
//! internal threads - the caller passes the current time to every command
//! and is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Finished
//!   ^                                           |
//!   +---------------- reset / start ------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut timer = StudyTimer::new(25);
//! timer.start(now_ms);
//! // In a loop:
//! if let Some(done) = timer.tick(now_ms) {
//!     engine.on_study_session_ended(done.minutes_studied)?;
//! }
//! ```

use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: u64 = 60_000;

/// Default session length.
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Produced by `tick()` when the countdown reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFinished {
    /// Whole minutes counted since the last start or resume.
    pub minutes_studied: u32,
}

/// Countdown for one study session.
///
/// Operates on wall-clock deltas -- no internal thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyTimer {
    state: TimerState,
    duration_ms: u64,
    /// Remaining time in milliseconds.
    remaining_ms: u64,
    /// Timestamp (ms since epoch) of the last start, resume or tick.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    /// Remaining time when the countdown last (re)started. Time before a
    /// pause is not credited.
    #[serde(default)]
    session_start_remaining_ms: u64,
}

impl Default for StudyTimer {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES)
    }
}

impl StudyTimer {
    /// Idle timer of `minutes` length (at least one minute).
    pub fn new(minutes: u32) -> Self {
        let duration_ms = u64::from(minutes.max(1)) * MS_PER_MINUTE;
        Self {
            state: TimerState::Idle,
            duration_ms,
            remaining_ms: duration_ms,
            last_tick_epoch_ms: None,
            session_start_remaining_ms: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// 0.0 .. 1.0 progress through the session.
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_ms as f64 / self.duration_ms as f64)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. Returns false if already running.
    pub fn start(&mut self, now_ms: u64) -> bool {
        match self.state {
            TimerState::Running => false,
            TimerState::Idle | TimerState::Paused | TimerState::Finished => {
                if self.state == TimerState::Finished {
                    self.remaining_ms = self.duration_ms;
                }
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now_ms);
                self.session_start_remaining_ms = self.remaining_ms;
                true
            }
        }
    }

    /// Returns false unless the timer was running.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if self.state != TimerState::Running {
            return false;
        }
        self.flush_elapsed(now_ms);
        self.state = TimerState::Paused;
        self.last_tick_epoch_ms = None;
        self.session_start_remaining_ms = 0;
        true
    }

    pub fn reset(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_ms = self.duration_ms;
        self.last_tick_epoch_ms = None;
        self.session_start_remaining_ms = 0;
    }

    /// Change the session length. Resets the timer.
    pub fn set_duration_minutes(&mut self, minutes: u32) {
        self.duration_ms = u64::from(minutes.max(1)) * MS_PER_MINUTE;
        self.reset();
    }

    /// Call periodically. Returns `Some` once, when the countdown finishes.
    pub fn tick(&mut self, now_ms: u64) -> Option<SessionFinished> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now_ms);
        if self.remaining_ms > 0 {
            return None;
        }

        self.state = TimerState::Finished;
        self.last_tick_epoch_ms = None;
        let minutes = self.session_start_remaining_ms / MS_PER_MINUTE;
        self.session_start_remaining_ms = 0;
        Some(SessionFinished {
            minutes_studied: u32::try_from(minutes).unwrap_or(u32::MAX),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self, now_ms: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now_ms.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now_ms.max(last));
        }
    }
}
