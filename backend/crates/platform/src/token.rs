//! JSON Web Tokens
//!
//! HS256 JWS tokens carrying `{sub, aud, iss, iat, exp, jti}`. `sub` is the
//! user id as a string, `aud` scopes what the token is good for (`/user` for
//! normal API access, `/reset` for the short-lived password reset grant).
//! `jti` lets a signed-out token be blacklisted until it expires.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::random_token;

pub const USER_AUDIENCE: &str = "/user";
pub const RESET_AUDIENCE: &str = "/reset";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,

    /// Bad signature, wrong algorithm, wrong issuer/audience/subject or garbage
    #[error("Token is invalid: {0}")]
    Invalid(String),

    #[error("Token could not be signed: {0}")]
    Signing(String),
}

/// Signs and verifies tokens with one shared HMAC secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
}

impl TokenSigner {
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: issuer.into(),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Issue a token for `subject`, valid for `ttl` from now.
    pub fn sign(&self, subject: &str, audience: &str, ttl: Duration) -> Result<(String, Claims), TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            aud: audience.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            jti: random_token(16),
        };
        let token = self.encode_claims(&claims)?;
        Ok((token, claims))
    }

    pub(crate) fn encode_claims(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify signature, algorithm, expiry, issuer and audience.
    ///
    /// When `subject` is given the `sub` claim must match it as well.
    pub fn verify(&self, token: &str, audience: &str, subject: Option<&str>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_audience(&[audience]);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "aud", "iss"]);
        validation.sub = subject.map(str::to_string);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("issuer", &self.issuer)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    const HOUR: Duration = Duration::from_secs(3600);

    fn signer() -> TokenSigner {
        TokenSigner::new(b"test-secret-test-secret-test-secret", "karma")
    }

    #[test]
    fn test_sign_and_verify() {
        let signer = signer();
        let (token, issued) = signer.sign("42", USER_AUDIENCE, HOUR).unwrap();
        let claims = signer.verify(&token, USER_AUDIENCE, Some("42")).unwrap();
        assert_eq!(claims, issued);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_subject_or_audience() {
        let signer = signer();
        let (token, _) = signer.sign("42", USER_AUDIENCE, HOUR).unwrap();
        assert!(matches!(
            signer.verify(&token, USER_AUDIENCE, Some("43")),
            Err(TokenError::Invalid(_))
        ));
        assert!(matches!(
            signer.verify(&token, RESET_AUDIENCE, None),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_expired_token() {
        let signer = signer();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "1".into(),
            aud: USER_AUDIENCE.into(),
            iss: "karma".into(),
            iat: now - 7200,
            exp: now - 3600,
            jti: "old".into(),
        };
        let token = signer.encode_claims(&claims).unwrap();
        assert_eq!(
            signer.verify(&token, USER_AUDIENCE, None),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let signer = signer();
        let (token, claims) = signer.sign("42", USER_AUDIENCE, HOUR).unwrap();

        let forged = Claims {
            sub: "1".into(),
            ..claims
        };
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let parts: Vec<&str> = token.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(matches!(
            signer.verify(&tampered, USER_AUDIENCE, None),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_other_secret_or_issuer_rejected() {
        let (token, _) = signer().sign("42", USER_AUDIENCE, HOUR).unwrap();

        let other_secret = TokenSigner::new(b"another-secret", "karma");
        assert!(other_secret.verify(&token, USER_AUDIENCE, None).is_err());

        let other_issuer = TokenSigner::new(b"test-secret-test-secret-test-secret", "elsewhere");
        assert!(other_issuer.verify(&token, USER_AUDIENCE, None).is_err());
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let secret = b"test-secret-test-secret-test-secret";
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "42".into(),
            aud: USER_AUDIENCE.into(),
            iss: "karma".into(),
            iat: now,
            exp: now + 60,
            jti: "x".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        assert!(matches!(
            TokenSigner::new(secret, "karma").verify(&token, USER_AUDIENCE, None),
            Err(TokenError::Invalid(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(signer().verify("not.a.jwt", USER_AUDIENCE, None).is_err());
        assert!(signer().verify("", USER_AUDIENCE, None).is_err());
    }
}
