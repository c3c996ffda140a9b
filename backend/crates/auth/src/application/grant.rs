//! Token Grants
//!
//! Every successful sign-in style operation answers with `{userId, authToken}`.

use std::time::Duration;

use kernel::id::UserId;
use platform::token::TokenSigner;

use crate::error::AuthResult;

#[derive(Debug, Clone)]
pub struct TokenGrant {
    pub user_id: UserId,
    pub auth_token: String,
}

impl TokenGrant {
    pub fn issue(
        signer: &TokenSigner,
        user_id: UserId,
        audience: &str,
        ttl: Duration,
    ) -> AuthResult<Self> {
        let (auth_token, _claims) = signer.sign(&user_id.to_string(), audience, ttl)?;
        Ok(Self {
            user_id,
            auth_token,
        })
    }
}
