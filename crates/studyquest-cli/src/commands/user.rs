//! Account commands: create, suggest, list and switch user tags.

use clap::Subcommand;
use rand::Rng;
use serde::Serialize;
use studyquest_core::account::suggest_tag;
use studyquest_core::{Config, Database, Profile, ProfileStore};

use crate::context::{engine_for, print_json, CliResult};

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a profile and make it the active user
    Create {
        /// User tag such as "SmartStudent#1234" (a random one if omitted)
        tag: Option<String>,
    },
    /// Print a random available tag
    Suggest,
    /// List local users
    List,
    /// Make an existing user the active one
    Switch {
        /// User tag
        tag: String,
    },
}

#[derive(Serialize)]
struct CreatedUser {
    tag: String,
    profile: Profile,
}

#[derive(Serialize)]
struct UserRow {
    tag: String,
    active: bool,
    level: u32,
    points: u64,
}

/// Draws before giving up on finding an unused tag.
const MAX_TAG_ATTEMPTS: usize = 100;

fn pick_free_tag<R: Rng + ?Sized>(rng: &mut R, taken: &[String], attempts: usize) -> Option<String> {
    (0..attempts)
        .map(|_| suggest_tag(rng))
        .find(|tag| !taken.contains(tag))
}

/// Random tag that no stored profile uses yet.
fn free_tag(db: &Database) -> CliResult<String> {
    let taken = db.users()?;
    pick_free_tag(&mut rand::thread_rng(), &taken, MAX_TAG_ATTEMPTS).ok_or_else(|| {
        format!("no free user tag after {MAX_TAG_ATTEMPTS} attempts; pass a tag explicitly").into()
    })
}

pub fn run(action: UserAction) -> CliResult {
    let mut config = Config::load()?;
    match action {
        UserAction::Create { tag } => {
            let tag = match tag {
                Some(tag) => tag,
                None => free_tag(&Database::open()?)?,
            };
            let mut engine = engine_for(tag, &config)?;
            let profile = engine.create_profile()?;
            let tag = engine.user().to_string();

            config.active_user = Some(tag.clone());
            config.save()?;
            print_json(&CreatedUser { tag, profile })?;
        }
        UserAction::Suggest => {
            println!("{}", free_tag(&Database::open()?)?);
        }
        UserAction::List => {
            let db = Database::open()?;
            let mut rows = Vec::new();
            for tag in db.users()? {
                let Some(profile) = db.get(&tag)? else {
                    continue;
                };
                rows.push(UserRow {
                    active: config.active_user.as_deref() == Some(tag.as_str()),
                    level: profile.level,
                    points: profile.points,
                    tag,
                });
            }
            print_json(&rows)?;
        }
        UserAction::Switch { tag } => {
            let db = Database::open()?;
            let tag = tag.trim().to_string();
            if db.get(&tag)?.is_none() {
                return Err(format!("unknown user: {tag}").into());
            }
            config.active_user = Some(tag.clone());
            config.save()?;
            println!("active user: {tag}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_free_tag_skips_taken_tags() {
        let first = suggest_tag(&mut StdRng::seed_from_u64(7));
        let tag = pick_free_tag(&mut StdRng::seed_from_u64(7), &[first.clone()], 10).unwrap();
        assert_ne!(tag, first);
    }

    #[test]
    fn test_pick_free_tag_gives_up_after_attempts() {
        let mut rng = StdRng::seed_from_u64(7);
        let taken: Vec<String> = (0..3).map(|_| suggest_tag(&mut rng)).collect();
        assert_eq!(pick_free_tag(&mut StdRng::seed_from_u64(7), &taken, 3), None);
        assert_eq!(pick_free_tag(&mut StdRng::seed_from_u64(7), &[], 0), None);
    }
}
