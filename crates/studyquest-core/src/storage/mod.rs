mod config;
pub mod database;
pub mod migrations;

pub use config::{Config, GameSection, NotificationsSection, TimerSection};
pub use database::Database;

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::profile::Profile;

/// Persistent home for user profiles, keyed by user tag.
pub trait ProfileStore {
    /// Stored profile for `user`, or `None` if nothing is stored.
    fn get(&self, user: &str) -> Result<Option<Profile>>;

    fn put(&mut self, user: &str, profile: &Profile) -> Result<()>;

    /// Every stored user tag, sorted.
    fn users(&self) -> Result<Vec<String>>;
}

impl<S: ProfileStore + ?Sized> ProfileStore for &mut S {
    fn get(&self, user: &str) -> Result<Option<Profile>> {
        (**self).get(user)
    }

    fn put(&mut self, user: &str, profile: &Profile) -> Result<()> {
        (**self).put(user, profile)
    }

    fn users(&self) -> Result<Vec<String>> {
        (**self).users()
    }
}

/// In-memory store.
#[derive(Debug, Default, Clone)]
pub struct MemoryProfileStore {
    profiles: BTreeMap<String, Profile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, user: &str) -> Result<Option<Profile>> {
        Ok(self.profiles.get(user).cloned())
    }

    fn put(&mut self, user: &str, profile: &Profile) -> Result<()> {
        self.profiles.insert(user.to_string(), profile.clone());
        Ok(())
    }

    fn users(&self) -> Result<Vec<String>> {
        Ok(self.profiles.keys().cloned().collect())
    }
}

/// Returns the data directory, creating it if needed.
///
/// `STUDYQUEST_DATA_DIR` wins when set. Otherwise `~/.config/studyquest`,
/// or `~/.config/studyquest-dev` when `STUDYQUEST_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("STUDYQUEST_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("STUDYQUEST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("studyquest-dev")
            } else {
                base_dir.join("studyquest")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryProfileStore::new();
        assert!(store.get("b#1").unwrap().is_none());

        let profile = Profile {
            points: 40,
            ..Profile::default()
        };
        store.put("b#1", &profile).unwrap();
        store.put("a#1", &Profile::default()).unwrap();

        assert_eq!(store.get("b#1").unwrap().unwrap().points, 40);
        assert_eq!(store.users().unwrap(), vec!["a#1", "b#1"]);
    }
}
