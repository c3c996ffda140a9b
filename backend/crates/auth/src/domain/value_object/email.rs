//! Email Value Object
//!
//! The email address is the registration key: it is stored lowercase and
//! every lookup goes through [`Email::new`] so the same address always maps
//! to the same row. Ownership is proven by the emailed one-time code, not here.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into().trim().to_lowercase();

        if email.is_empty() {
            return Err(AppError::bad_request("No email was specified"));
        }

        if email.len() > EMAIL_MAX_LENGTH || !is_plausible_address(&email) {
            return Err(AppError::bad_request("Input validation failed")
                .with_errors([format!("'{email}' is not a valid email address")]));
        }

        Ok(Self(email))
    }

    /// Trust a value read back from the database.
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One `@`, a non-empty local part and a dotted hostname.
fn is_plausible_address(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }

    if !domain.contains('.')
        || domain.starts_with(['.', '-'])
        || domain.ends_with(['.', '-'])
        || domain.contains("..")
    {
        return false;
    }

    domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
}

impl TryFrom<String> for Email {
    type Error = AppError;

    fn try_from(value: String) -> AppResult<Self> {
        Email::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl FromStr for Email {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Email::new(s)
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::new("paul@karma.com").is_ok());
        assert!(Email::new("user.name@example.co.uk").is_ok());
        assert!(Email::new("user+tag@example.com").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::new("userexample.com").is_err());
        assert!(Email::new("user@").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@@example.com").is_err());
        assert!(Email::new("user@example").is_err());
        assert!(Email::new("user@exa..mple.com").is_err());
    }

    #[test]
    fn test_empty_email_message() {
        let err = Email::new("   ").unwrap_err();
        assert_eq!(err.message(), "No email was specified");
    }

    #[test]
    fn test_email_case_normalization() {
        let email = Email::new("  Paul@Karma.COM ").unwrap();
        assert_eq!(email.as_str(), "paul@karma.com");
    }

    #[test]
    fn test_deserialize_normalizes() {
        let email: Email = serde_json::from_str(r#""Paul@Karma.com""#).unwrap();
        assert_eq!(email.as_str(), "paul@karma.com");
        assert!(serde_json::from_str::<Email>(r#""nope""#).is_err());
    }
}
