//! # StudyQuest Core Library
//!
//! This library provides the progression and gamification engine behind the
//! StudyQuest study tracker. It follows a CLI-first philosophy: every
//! operation is available through the standalone `studyquest` binary, which
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Gamification**: combo multiplier, XP and levels with cosmetic rewards,
//!   the weekly goal, daily challenges, personal records and medals, composed
//!   by a fixed-order pipeline over a single [`Profile`]
//! - **Engine**: loads a profile from a [`ProfileStore`], runs the pipeline,
//!   saves it and hands notifications to a [`Notifier`]
//! - **Study Timer**: a wall-clock countdown that requires the caller to
//!   periodically invoke `tick()`
//! - **Storage**: SQLite profile storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Engine`]: Event entry points and refreshed read accessors
//! - [`Profile`]: Per-user progression state
//! - [`StudyTimer`]: Study session countdown
//! - [`Database`]: Profile persistence
//! - [`Config`]: Application configuration management

pub mod account;
pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod gamification;
pub mod leaderboard;
pub mod profile;
pub mod report;
pub mod storage;
pub mod task;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use engine::{ComboView, Engine, ProgressionView};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::{CollectingNotifier, Event, LogNotifier, Notifier, SilentNotifier};
pub use gamification::{
    ChallengeKind, ChallengeState, GameConfig, MedalView, Multiplier, RewardKind, StudyOutcome,
    TaskOutcome, TickOutcome, WeeklyGoal,
};
pub use leaderboard::Leaderboard;
pub use profile::Profile;
pub use report::WeeklyReport;
pub use storage::{Config, Database, MemoryProfileStore, ProfileStore};
pub use task::{CompletedTask, Priority};
pub use timer::{StudyTimer, TimerState};
