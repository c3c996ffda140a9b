//! Authenticate Use Case
//!
//! Turns the `Authorization` header into the calling user. The header
//! carries the bare token or `Bearer <token>`.

use std::sync::Arc;

use kernel::caller::CurrentUser;
use kernel::id::UserId;
use platform::token::Claims;

use crate::application::config::AuthConfig;
use crate::domain::repository::TokenBlacklistRepository;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone)]
pub struct Authenticated {
    pub user: CurrentUser,
    pub claims: Claims,
}

pub struct AuthenticateUseCase<B>
where
    B: TokenBlacklistRepository,
{
    blacklist: Arc<B>,
    config: Arc<AuthConfig>,
}

impl<B> AuthenticateUseCase<B>
where
    B: TokenBlacklistRepository + Sync,
{
    pub fn new(blacklist: Arc<B>, config: Arc<AuthConfig>) -> Self {
        Self { blacklist, config }
    }

    /// Verify a token issued for `audience` and not signed out since.
    pub async fn execute(
        &self,
        authorization: Option<&str>,
        audience: &str,
    ) -> AuthResult<Authenticated> {
        let token = bearer_token(authorization).ok_or(AuthError::MissingAuthToken)?;

        let claims = self.config.signer.verify(token, audience, None)?;

        if self.blacklist.is_blacklisted(&claims.jti).await? {
            return Err(AuthError::RevokedAuthToken);
        }

        let user_id: UserId = claims
            .sub
            .parse()
            .map_err(|_| AuthError::InvalidAuthToken)?;

        Ok(Authenticated {
            user: CurrentUser { user_id },
            claims,
        })
    }
}

/// Token from an `Authorization` value, with or without the `Bearer` scheme.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let value = authorization?.trim_start();
    let token = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ if value.trim_end().eq_ignore_ascii_case("bearer") => "",
        _ => value.trim(),
    };
    (!token.is_empty()).then_some(token)
}
