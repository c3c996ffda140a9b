//! Sign Out Use Case
//!
//! Bearer tokens are stateless, so signing out blacklists the token id
//! until the token would have expired anyway.

use std::sync::Arc;

use platform::token::Claims;

use crate::domain::repository::TokenBlacklistRepository;
use crate::error::AuthResult;

pub struct SignOutUseCase<B>
where
    B: TokenBlacklistRepository,
{
    blacklist: Arc<B>,
}

impl<B> SignOutUseCase<B>
where
    B: TokenBlacklistRepository + Sync,
{
    pub fn new(blacklist: Arc<B>) -> Self {
        Self { blacklist }
    }

    pub async fn execute(&self, claims: &Claims) -> AuthResult<()> {
        self.blacklist
            .blacklist_token(&claims.jti, claims.expires_at())
            .await?;

        tracing::info!(user_id = %claims.sub, "User signed out");
        Ok(())
    }
}
