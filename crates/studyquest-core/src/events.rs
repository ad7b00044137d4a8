use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Timestamp;
use crate::gamification::challenges::ChallengeKind;
use crate::gamification::combo::Multiplier;
use crate::gamification::medals;
use crate::gamification::progression::Reward;
use crate::gamification::records::RecordKind;

/// Every state change in the engine produces an Event.
/// The engine hands each one to the active [`Notifier`] after the profile
/// has been saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskCompleted {
        task_id: String,
        points: u64,
        xp: u64,
        multiplier: Multiplier,
        at: Timestamp,
    },
    /// Chain reached 3, 5 or 10 through an increment.
    ComboMilestone {
        combo: u32,
        multiplier: Multiplier,
    },
    /// A live chain went stale and dropped to zero.
    ComboExpired {
        combo: u32,
        at: Timestamp,
    },
    LevelUp {
        level: u32,
    },
    RewardUnlocked {
        reward: Reward,
    },
    WeeklyGoalReached {
        target: u32,
        bonus_xp: u64,
    },
    ChallengeCompleted {
        challenge: ChallengeKind,
        bonus: u64,
    },
    ChallengesReset {
        date: NaiveDate,
    },
    PersonalRecord {
        record: RecordKind,
        value: u64,
    },
    MedalUnlocked {
        medal_id: String,
        bonus: u64,
    },
    /// A timed study session was logged.
    TimerFinished {
        minutes: u32,
        points: u64,
    },
}

impl Event {
    /// User-facing notification text.
    pub fn message(&self) -> String {
        match self {
            Event::TaskCompleted {
                points,
                xp,
                multiplier,
                ..
            } => {
                if multiplier.is_bonus() {
                    format!("Task completed! +{points} points, +{xp} XP ({multiplier} combo!)")
                } else {
                    format!("Task completed! +{points} points, +{xp} XP")
                }
            }
            Event::ComboMilestone { combo, multiplier } => {
                format!("{combo}x combo! Rewards now earn {multiplier}")
            }
            Event::ComboExpired { combo, .. } => format!("Combo of {combo} expired"),
            Event::LevelUp { level } => format!("Level up! You reached level {level}"),
            Event::RewardUnlocked { reward } => {
                format!("New {} unlocked: {}", reward.kind.label(), reward.name)
            }
            Event::WeeklyGoalReached { target, bonus_xp } => {
                format!("Weekly goal of {target} tasks reached! +{bonus_xp} XP")
            }
            Event::ChallengeCompleted { challenge, bonus } => {
                format!("Challenge complete: {challenge}! +{bonus} points")
            }
            Event::ChallengesReset { .. } => "New daily challenges are available".to_string(),
            Event::PersonalRecord { record, value } => match record {
                RecordKind::BestDay => {
                    format!("New personal record: {value} tasks in one day")
                }
                other => format!("New personal record ({other:?}): {value}"),
            },
            Event::MedalUnlocked { medal_id, bonus } => {
                let name = medals::find(medal_id).map_or(medal_id.as_str(), |m| m.name);
                format!("Medal unlocked: {name}! +{bonus} points")
            }
            Event::TimerFinished { minutes, points } => {
                format!("Study session complete: {minutes} minutes. +{points} points")
            }
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, message: &str) {
        (**self).notify(message)
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&mut self, message: &str) {
        (**self).notify(message)
    }
}

/// Writes notifications to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) {
        tracing::info!(target: "studyquest::notify", "{message}");
    }
}

/// Drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&mut self, _message: &str) {}
}

/// Keeps notifications in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingNotifier {
    pub messages: Vec<String>,
}

impl Notifier for CollectingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gamification::progression::RewardKind;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let json = serde_json::to_value(Event::LevelUp { level: 4 }).unwrap();
        assert_eq!(json["type"], "LevelUp");
        assert_eq!(json["level"], 4);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            Event::MedalUnlocked {
                medal_id: "first-task".into(),
                bonus: 100
            }
            .message(),
            "Medal unlocked: First Steps! +100 points"
        );
        assert_eq!(
            Event::RewardUnlocked {
                reward: Reward {
                    kind: RewardKind::Theme,
                    name: "ocean".into()
                }
            }
            .message(),
            "New theme unlocked: ocean"
        );
        assert_eq!(
            Event::ChallengeCompleted {
                challenge: ChallengeKind::Speed,
                bonus: 30
            }
            .message(),
            "Challenge complete: Speed Demon! +30 points"
        );
    }

    #[test]
    fn test_task_completed_message_reports_xp() {
        let at = chrono::DateTime::parse_from_rfc3339("2026-10-20T10:00:00+00:00").unwrap();
        let plain = Event::TaskCompleted {
            task_id: "t1".into(),
            points: 25,
            xp: 25,
            multiplier: Multiplier::BASE,
            at,
        };
        assert_eq!(plain.message(), "Task completed! +25 points, +25 XP");

        let chained = Event::TaskCompleted {
            task_id: "t2".into(),
            points: 37,
            xp: 37,
            multiplier: Multiplier::try_from(1.5).unwrap(),
            at,
        };
        assert_eq!(
            chained.message(),
            "Task completed! +37 points, +37 XP (1.5x combo!)"
        );
    }

    #[test]
    fn test_collecting_notifier_through_reference() {
        let mut sink = CollectingNotifier::default();
        {
            let mut by_ref = &mut sink;
            by_ref.notify("one");
            Notifier::notify(&mut by_ref, "two");
        }
        assert_eq!(sink.messages, vec!["one", "two"]);
    }
}
