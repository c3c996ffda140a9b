//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::crypto::random_bytes;
use platform::token::TokenSigner;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Signs and verifies bearer tokens (HS256)
    pub signer: TokenSigner,
    /// Lifetime of a sign-in token
    pub token_ttl: Duration,
    /// Lifetime of the `/reset` token granted after a confirmed reset code
    pub reset_grant_ttl: Duration,
    /// Lifetime of an email verification code
    pub verification_code_ttl: Duration,
    /// Lifetime of a password reset code
    pub reset_code_ttl: Duration,
    /// Apply the password strength test to newly chosen passwords
    pub enforce_password_strength: bool,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            signer: TokenSigner::new(&random_bytes(32), "karma"),
            token_ttl: Duration::from_secs(24 * 3600),
            reset_grant_ttl: Duration::from_secs(15 * 60),
            verification_code_ttl: Duration::from_secs(15 * 60),
            reset_code_ttl: Duration::from_secs(3600),
            enforce_password_strength: true,
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Config signing with a fixed secret (production)
    pub fn with_secret(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            signer: TokenSigner::new(secret, issuer),
            ..Default::default()
        }
    }

    /// Random secret; tokens do not survive a restart
    pub fn development() -> Self {
        Self::default()
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    pub(crate) fn verification_code_ttl(&self) -> chrono::Duration {
        to_chrono(self.verification_code_ttl)
    }

    pub(crate) fn reset_code_ttl(&self) -> chrono::Duration {
        to_chrono(self.reset_code_ttl)
    }
}

fn to_chrono(ttl: Duration) -> chrono::Duration {
    chrono::Duration::seconds(ttl.as_secs() as i64)
}
