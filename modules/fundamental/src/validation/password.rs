use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

pub const MIN_LENGTH: usize = 8;
pub const MAX_SIMILARITY: f64 = 0.7;

pub const TOO_COMMON: &str = "This password is too common.";
pub const ENTIRELY_NUMERIC: &str = "This password is entirely numeric.";
pub const TOO_SHORT: &str = "This password is too short. It must contain at least 8 characters.";

static COMMON_PASSWORDS: &str = include_str!("common-passwords.txt");

fn common_passwords() -> &'static HashSet<&'static str> {
    static LOCK: OnceLock<HashSet<&'static str>> = OnceLock::new();
    LOCK.get_or_init(|| {
        COMMON_PASSWORDS
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    })
}

/// The attributes of a user a password must not resemble.
#[derive(Clone, Copy, Debug, Default)]
pub struct UserAttributes<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
}

impl<'a> UserAttributes<'a> {
    fn named(&self) -> [(&'static str, &'a str); 4] {
        [
            ("username", self.username),
            ("first name", self.first_name),
            ("last name", self.last_name),
            ("email address", self.email),
        ]
    }
}

/// Check the strength of a password.
///
/// Reports the first failing check, in order: similarity to the user's attributes, membership
/// in the list of common passwords, numeric only, and the minimum length.
pub fn check_password(password: &str, user: &UserAttributes) -> Result<(), Cow<'static, str>> {
    if let Some(attribute) = similar_attribute(password, user) {
        return Err(format!("The password is too similar to the {attribute}.").into());
    }

    if common_passwords().contains(password.trim().to_lowercase().as_str()) {
        return Err(TOO_COMMON.into());
    }

    if !password.is_empty() && password.chars().all(|c| c.is_numeric()) {
        return Err(ENTIRELY_NUMERIC.into());
    }

    if password.chars().count() < MIN_LENGTH {
        return Err(TOO_SHORT.into());
    }

    Ok(())
}

fn similar_attribute(password: &str, user: &UserAttributes) -> Option<&'static str> {
    let password = password.to_lowercase();

    for (name, value) in user.named() {
        if value.is_empty() {
            continue;
        }

        let value = value.to_lowercase();
        let parts = value
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|part| !part.is_empty())
            .chain(std::iter::once(value.as_str()));

        for part in parts {
            if exceeds_maximum_length_ratio(&password, part) {
                continue;
            }
            if quick_ratio(&password, part) >= MAX_SIMILARITY {
                return Some(name);
            }
        }
    }

    None
}

/// A short value can't be similar to a much longer password.
fn exceeds_maximum_length_ratio(password: &str, value: &str) -> bool {
    let password_len = password.chars().count();
    let value_len = value.chars().count();
    let bound = MAX_SIMILARITY / 2.0 * password_len as f64;
    password_len >= 10 * value_len && (value_len as f64) < bound
}

/// An upper bound of the similarity of two strings, ignoring the order of characters.
///
/// Twice the number of shared characters (counting duplicates) over the total length.
pub fn quick_ratio(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let mut available = HashMap::<char, usize>::new();
    for c in b.chars() {
        *available.entry(c).or_default() += 1;
    }

    let mut matches = 0usize;
    for c in a.chars() {
        if let Some(count) = available.get_mut(&c) {
            if *count > 0 {
                *count -= 1;
                matches += 1;
            }
        }
    }

    2.0 * matches as f64 / total as f64
}
