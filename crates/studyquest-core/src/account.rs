//! User tags: validation and random suggestions for new accounts.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ValidationError;

pub const MIN_TAG_LEN: usize = 3;

const ADJECTIVES: &[&str] = &[
    "Smart", "Clever", "Bright", "Quick", "Sharp", "Wise", "Epic", "Super", "Mega", "Cool", "Swift",
    "Brave", "Bold", "Calm",
];

const NOUNS: &[&str] = &[
    "Student", "Scholar", "Learner", "Genius", "Brain", "Master", "Pro", "Ace", "Star", "Hero",
    "Wizard", "Champion", "Legend",
];

/// Check a user tag and return its trimmed form.
pub fn validate_tag(tag: &str) -> Result<String, ValidationError> {
    let trimmed = tag.trim();
    if trimmed.chars().count() < MIN_TAG_LEN {
        return Err(ValidationError::InvalidTag {
            tag: tag.to_string(),
            message: format!("must be at least {MIN_TAG_LEN} characters"),
        });
    }
    Ok(trimmed.to_string())
}

/// Random `{Adjective}{Noun}#{1000..=9999}` tag.
pub fn suggest_tag<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Smart");
    let noun = NOUNS.choose(rng).copied().unwrap_or("Student");
    let number: u16 = rng.gen_range(1000..=9999);
    format!("{adjective}{noun}#{number}")
}

/// Name shown for a tag: everything before the first `#`.
pub fn display_name(tag: &str) -> &str {
    tag.split('#').next().unwrap_or(tag)
}
