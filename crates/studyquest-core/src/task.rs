//! Task-completion input supplied by the task source.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Points (and XP) a completion is worth before the combo multiplier.
    pub fn base_points(self) -> u64 {
        match self {
            Priority::Low => 15,
            Priority::Medium => 25,
            Priority::High => 50,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ValidationError::UnknownPriority(s.to_string())),
        }
    }
}

/// A task the user just checked off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedTask {
    pub id: String,
    pub priority: Priority,
    /// Subject label; empty when the task has none.
    #[serde(default)]
    pub subject: String,
    pub completed_at: Timestamp,
    /// When work on the task began, if the task source tracks it.
    #[serde(default)]
    pub started_at: Option<Timestamp>,
}

impl CompletedTask {
    pub fn new(id: impl Into<String>, priority: Priority, completed_at: Timestamp) -> Self {
        Self {
            id: id.into(),
            priority,
            subject: String::new(),
            completed_at,
            started_at: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_started_at(mut self, started_at: Timestamp) -> Self {
        self.started_at = Some(started_at);
        self
    }

    /// Trimmed subject, or `None` when blank.
    pub fn subject(&self) -> Option<&str> {
        let subject = self.subject.trim();
        (!subject.is_empty()).then_some(subject)
    }

    /// Whole minutes between start and completion.
    pub fn duration_minutes(&self) -> Option<u32> {
        let started = self.started_at?;
        let minutes = self.completed_at.signed_duration_since(started).num_minutes();
        u32::try_from(minutes).ok()
    }
}
