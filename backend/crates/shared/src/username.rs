//! Account Username
//!
//! Display handle chosen at registration and changed from the profile
//! editor. It is not a login key (sign-in is by email), so only shape is
//! checked: NFKC normalized, 3 to 30 characters, no control characters.

use crate::error::app_error::{AppError, AppResult};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(raw: &str) -> AppResult<Self> {
        let normalized: String = raw.nfkc().collect::<String>().trim().to_string();
        let length = normalized.chars().count();

        let mut errors = Vec::new();
        if !(USERNAME_MIN_LENGTH..=USERNAME_MAX_LENGTH).contains(&length) {
            errors.push(format!(
                "username must be between {USERNAME_MIN_LENGTH} and {USERNAME_MAX_LENGTH} characters"
            ));
        }
        if normalized.chars().any(char::is_control) {
            errors.push("username may not contain control characters".to_string());
        }

        if !errors.is_empty() {
            return Err(AppError::bad_request("Input validation failed").with_errors(errors));
        }

        Ok(Self(normalized))
    }

    pub fn from_db(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
