//! Forgotten Password Use Case
//!
//! Three steps: request a code by email, exchange the code for a short-lived
//! `/reset` token, then set a new password with that token. Only the latest
//! code issued to a user is accepted.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use platform::mail::{MailMessage, Mailer};
use platform::token::{Claims, RESET_AUDIENCE};

use crate::application::config::AuthConfig;
use crate::application::grant::TokenGrant;
use crate::domain::entity::reset::ResetToken;
use crate::domain::repository::{ResetRepository, TokenBlacklistRepository, UserRepository};
use crate::domain::services::choose_password;
use crate::domain::value_object::{
    email::Email,
    one_time_code::{OneTimeCode, check_code},
};
use crate::error::{AuthError, AuthResult};

pub struct PasswordResetUseCase<R, M>
where
    R: UserRepository + ResetRepository + TokenBlacklistRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> PasswordResetUseCase<R, M>
where
    R: UserRepository + ResetRepository + TokenBlacklistRepository + Sync,
    M: Mailer + Sync,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    /// Email a reset code. Returns the normalized address it was sent to.
    pub async fn request_code(&self, email: Option<&str>) -> AuthResult<Email> {
        let email = email
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(AuthError::EmailMissing)?;
        let email = Email::new(email)?;

        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let ttl = self.config.reset_code_ttl();
        let reset = ResetToken {
            user_id: user.id,
            code: OneTimeCode::generate(ttl),
        };
        self.repo.insert_reset(&reset).await?;

        let message = MailMessage {
            to: email.to_string(),
            subject: "Reset your Karma password".to_string(),
            text: format!(
                "Your Karma password reset code is {}. It expires in {} minutes.",
                reset.code.code,
                ttl.num_minutes()
            ),
        };
        self.mailer.send(&message).await?;

        tracing::info!(user_id = %user.id, "Password reset code sent");
        Ok(email)
    }

    /// Exchange a reset code for a `/reset` token.
    pub async fn confirm_code(&self, email: &str, token: Option<&str>) -> AuthResult<TokenGrant> {
        if token.map(str::trim).is_none_or(str::is_empty) {
            return Err(AuthError::CodeMissing);
        }

        let email = Email::new(email)?;
        let user = self
            .repo
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let latest = self.repo.latest_reset(user.id).await?;
        check_code(latest.as_ref().map(|r| &r.code), token, email.as_str(), Utc::now())?;

        tracing::info!(user_id = %user.id, "Password reset code accepted");

        TokenGrant::issue(
            &self.config.signer,
            user.id,
            RESET_AUDIENCE,
            self.config.reset_grant_ttl,
        )
    }

    /// Set the new password. The `/reset` token is spent afterwards.
    pub async fn reset_password(
        &self,
        grant: &Claims,
        user_id: UserId,
        password: String,
        confirmation: &str,
    ) -> AuthResult<()> {
        let password =
            choose_password(password, confirmation, self.config.enforce_password_strength)?;

        let user = self
            .repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let password_hash = password.hash(self.config.pepper())?;
        self.repo.update_password_hash(user.id, &password_hash).await?;
        self.repo
            .blacklist_token(&grant.jti, grant.expires_at())
            .await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }
}
