//! Register User Use Case
//!
//! Creates the user account for a verified email and signs the user in.

use std::sync::Arc;

use platform::token::USER_AUDIENCE;

use crate::application::config::AuthConfig;
use crate::application::grant::TokenGrant;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::{RegistrationRepository, UserRepository};
use crate::domain::services::choose_password;
use crate::domain::value_object::{email::Email, username::Username};
use crate::error::{AuthError, AuthResult};

pub struct RegisterUserInput {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
}

pub struct RegisterUserUseCase<R>
where
    R: RegistrationRepository + UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUserUseCase<R>
where
    R: RegistrationRepository + UserRepository + Sync,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterUserInput) -> AuthResult<TokenGrant> {
        let email = Email::new(input.email)?;

        let verified = self
            .repo
            .find_registration(&email)
            .await?
            .is_some_and(|r| r.email_flag);
        if !verified {
            return Err(AuthError::EmailNotVerified);
        }

        if self.repo.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyRegistered);
        }

        let username = Username::new(&input.username)?;
        let password = choose_password(
            input.password,
            &input.password_confirmation,
            self.config.enforce_password_strength,
        )?;
        let password_hash = password.hash(self.config.pepper())?;

        let user = self
            .repo
            .insert_user(&NewUser {
                email,
                username,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User account registered");

        TokenGrant::issue(&self.config.signer, user.id, USER_AUDIENCE, self.config.token_ttl)
    }
}
