//! One-Time Code
//!
//! Six digit code emailed to prove ownership of an address. The same check
//! guards email verification and password reset.

use chrono::{DateTime, Duration, Utc};
use platform::crypto::{constant_time_eq, numeric_code};

use crate::error::{AuthError, AuthResult};

pub const CODE_DIGITS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    pub fn generate(ttl: Duration) -> Self {
        Self {
            code: numeric_code(CODE_DIGITS),
            expires_at: Utc::now() + ttl,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Check a supplied code against the one on record.
///
/// Order matters to the client: missing input, nothing sent, expired,
/// then mismatch.
pub fn check_code(
    stored: Option<&OneTimeCode>,
    supplied: Option<&str>,
    email: &str,
    now: DateTime<Utc>,
) -> AuthResult<()> {
    let supplied = supplied
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AuthError::CodeMissing)?;

    let stored = stored.ok_or_else(|| AuthError::NoCodeSent(email.to_string()))?;

    if stored.is_expired_at(now) {
        return Err(AuthError::CodeExpired);
    }

    if !constant_time_eq(stored.code.as_bytes(), supplied.as_bytes()) {
        return Err(AuthError::CodeMismatch);
    }

    Ok(())
}
