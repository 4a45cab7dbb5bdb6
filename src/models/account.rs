use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::WeakPassword;

/// A registered login identity. The hash is a salted bcrypt digest; the
/// plaintext password is dropped as soon as the hash is computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$";

/// Check an address against the standard email shape.
pub fn valid_email(email: &str) -> bool {
    Regex::new(EMAIL_PATTERN)
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

/// Password rules, reported in a fixed order: length, then uppercase,
/// lowercase, digit.
pub fn check_password(password: &str) -> Result<(), WeakPassword> {
    if password.chars().count() < 8 {
        return Err(WeakPassword::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(WeakPassword::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(WeakPassword::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(WeakPassword::MissingDigit);
    }
    Ok(())
}
