//! Engine wiring shared by the user-facing commands.

use std::error::Error;

use serde::Serialize;
use studyquest_core::{Config, Database, Engine, Notifier, SilentNotifier, SystemClock, ValidationError};

pub type CliEngine = Engine<Database, SystemClock, Box<dyn Notifier>>;

pub type CliResult<T = ()> = Result<T, Box<dyn Error>>;

/// Prints notifications on stderr so stdout stays machine-readable.
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

/// `--user` wins over the configured active user.
pub fn resolve_user(explicit: Option<String>, config: &Config) -> Result<String, ValidationError> {
    explicit
        .or_else(|| config.active_user.clone())
        .filter(|tag| !tag.trim().is_empty())
        .ok_or(ValidationError::NoActiveUser)
}

pub fn notifier_for(config: &Config) -> Box<dyn Notifier> {
    if config.notifications.enabled {
        Box::new(StderrNotifier)
    } else {
        Box::new(SilentNotifier)
    }
}

/// Engine for `tag` over the on-disk database.
pub fn engine_for(tag: String, config: &Config) -> CliResult<CliEngine> {
    let db = Database::open()?;
    Ok(Engine::new(db, SystemClock, notifier_for(config), tag).with_config(config.game_config()))
}

/// Load config, resolve the acting user and build the engine.
pub fn open_engine(user: Option<String>) -> CliResult<(CliEngine, Config)> {
    let config = Config::load()?;
    let tag = resolve_user(user, &config)?;
    let engine = engine_for(tag, &config)?;
    Ok((engine, config))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_user_overrides_config() {
        let config = Config {
            active_user: Some("Owl#1234".into()),
            ..Config::default()
        };
        assert_eq!(resolve_user(Some("Fox#1".into()), &config).unwrap(), "Fox#1");
        assert_eq!(resolve_user(None, &config).unwrap(), "Owl#1234");
    }

    #[test]
    fn missing_user_is_an_error() {
        assert_eq!(
            resolve_user(None, &Config::default()),
            Err(ValidationError::NoActiveUser)
        );
        assert_eq!(
            resolve_user(Some("  ".into()), &Config::default()),
            Err(ValidationError::NoActiveUser)
        );
    }
}
