//! Password Hashing, Verification and Strength Testing
//!
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of clear text on drop
//! - Strength test mirroring the OWASP password strength rules
//!
//! Strength is only enforced when a password is *chosen* (registration,
//! reset, change). Verifying a login never applies the policy, so accounts
//! created under an older policy can still sign in.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants (OWASP strength test defaults)
// ============================================================================

pub const MIN_PASSWORD_LENGTH: usize = 10;

/// Passwords must be *shorter* than this.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Passwords at least this long are passphrases and skip the optional tests.
pub const MIN_PASSPHRASE_LENGTH: usize = 20;

/// Optional character-class tests a non-passphrase must pass.
pub const MIN_OPTIONAL_TESTS: usize = 4;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password cannot be empty")]
    Empty,

    /// Far beyond the strength limit; refused before hashing.
    #[error("Password must be fewer than {max} characters")]
    TooLong { max: usize },
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Strength report
// ============================================================================

/// Outcome of [`ClearTextPassword::strength`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StrengthReport {
    pub errors: Vec<String>,
    pub required_failed: usize,
    pub optional_passed: usize,
    pub is_passphrase: bool,
}

impl StrengthReport {
    pub fn is_strong(&self) -> bool {
        self.required_failed == 0
            && (self.is_passphrase || self.optional_passed >= MIN_OPTIONAL_TESTS)
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone`
/// - Debug output is redacted
///
/// ```rust
/// use platform::password::ClearTextPassword;
///
/// let password = ClearTextPassword::new("Correct-Horse-9".to_string()).unwrap();
/// assert!(password.strength().is_strong());
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Unicode NFKC normalization, then reject empty and oversized input.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.is_empty() {
            return Err(PasswordPolicyError::Empty);
        }

        if normalized.chars().count() > MAX_PASSWORD_LENGTH * 8 {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
            });
        }

        Ok(Self(normalized))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Run the OWASP strength test.
    pub fn strength(&self) -> StrengthReport {
        let password = self.0.as_str();
        let length = password.chars().count();
        let mut report = StrengthReport::default();

        // Required tests
        if length < MIN_PASSWORD_LENGTH {
            report.errors.push(format!(
                "The password must be at least {MIN_PASSWORD_LENGTH} characters long."
            ));
            report.required_failed += 1;
        }
        if length >= MAX_PASSWORD_LENGTH {
            report.errors.push(format!(
                "The password must be fewer than {MAX_PASSWORD_LENGTH} characters."
            ));
            report.required_failed += 1;
        }
        if has_repeated_run(password) {
            report.errors.push(
                "The password may not contain sequences of three or more repeated characters."
                    .to_string(),
            );
            report.required_failed += 1;
        }

        report.is_passphrase = length >= MIN_PASSPHRASE_LENGTH;
        if report.is_passphrase {
            return report;
        }

        // Optional tests
        let optional: [(fn(char) -> bool, &str); 4] = [
            (
                |c| c.is_ascii_lowercase(),
                "The password must contain at least one lowercase letter.",
            ),
            (
                |c| c.is_ascii_uppercase(),
                "The password must contain at least one uppercase letter.",
            ),
            (
                |c| c.is_ascii_digit(),
                "The password must contain at least one number.",
            ),
            (
                |c| !c.is_ascii_alphanumeric(),
                "The password must contain at least one special character.",
            ),
        ];
        for (test, message) in optional {
            if password.chars().any(test) {
                report.optional_passed += 1;
            } else {
                report.errors.push(message.to_string());
            }
        }

        report
    }

    /// Hash the password using Argon2id
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret appended before hashing
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedPassword, PasswordHashError> {
        let password_bytes = peppered(self, pepper);
        let salt = SaltString::generate(OsRng);

        // Argon2id with the crate defaults (m=19456, t=2, p=1)
        let hash = Argon2::default()
            .hash_password(&password_bytes, &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl PartialEq for ClearTextPassword {
    fn eq(&self, other: &Self) -> bool {
        crate::crypto::constant_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a password against this hash (constant time inside argon2).
    pub fn verify(&self, password: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        let parsed_hash = match PasswordHash::new(&self.hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        Argon2::default()
            .verify_password(&peppered(password, pepper), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn peppered(password: &ClearTextPassword, pepper: Option<&[u8]>) -> Vec<u8> {
    let mut bytes = password.as_bytes().to_vec();
    if let Some(p) = pepper {
        bytes.extend_from_slice(p);
    }
    bytes
}

/// Three or more identical characters in a row.
fn has_repeated_run(password: &str) -> bool {
    let chars: Vec<char> = password.chars().collect();
    chars.windows(3).any(|w| w[0] == w[1] && w[1] == w[2])
}

// ============================================================================
// Tests
// ============================================================================
