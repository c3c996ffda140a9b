//! Sign In Use Case
//!
//! Authenticates a user by email and password and issues a bearer token.

use std::sync::Arc;

use platform::password::ClearTextPassword;
use platform::token::USER_AUDIENCE;

use crate::application::config::AuthConfig;
use crate::application::grant::TokenGrant;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
}

pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository + Sync,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<TokenGrant> {
        let email = Email::new(input.email)?;

        let user = self
            .user_repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        // The strength policy is not applied here: older accounts must still sign in
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidPassword)?;

        if !user.password_hash.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidPassword);
        }

        tracing::info!(user_id = %user.id, "User signed in");

        TokenGrant::issue(&self.config.signer, user.id, USER_AUDIENCE, self.config.token_ttl)
    }
}
