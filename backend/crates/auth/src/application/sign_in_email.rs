//! Sign In Email Use Case
//!
//! First screen of the app: the user types an email and is routed to the
//! next step of the sign-up flow. Unknown emails are recorded and sent a
//! verification code on the spot.

use std::sync::Arc;

use chrono::Duration;
use platform::mail::{MailMessage, Mailer};

use crate::application::config::AuthConfig;
use crate::domain::entity::registration::{Registration, RegistrationStatus};
use crate::domain::repository::{RegistrationRepository, UserRepository};
use crate::domain::value_object::{email::Email, one_time_code::OneTimeCode};
use crate::error::AuthResult;

pub struct SignInEmailUseCase<R, M>
where
    R: RegistrationRepository + UserRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> SignInEmailUseCase<R, M>
where
    R: RegistrationRepository + UserRepository + Sync,
    M: Mailer + Sync,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: &str) -> AuthResult<RegistrationStatus> {
        let email = Email::new(email)?;

        let registration = self.repo.find_registration(&email).await?;
        let Some(registration) = registration else {
            self.record_email(email).await?;
            return Ok(RegistrationStatus::EmailRecorded);
        };

        let user = self.repo.find_user_by_email(&email).await?;
        let has_profile = match &user {
            Some(user) => self.repo.has_profile(user.id).await?,
            None => false,
        };

        let status = RegistrationStatus::from_records(Some(&registration), user.is_some(), has_profile);
        tracing::debug!(email = %email, status = ?status, "Sign-in email status");
        Ok(status)
    }

    async fn record_email(&self, email: Email) -> AuthResult<()> {
        let code = OneTimeCode::generate(self.config.verification_code_ttl());
        let registration = Registration::new(email, code);
        self.repo.save_registration(&registration).await?;

        send_verification_code(
            self.mailer.as_ref(),
            &registration,
            self.config.verification_code_ttl(),
        )
        .await?;

        tracing::info!(email = %registration.email, "Email recorded for registration");
        Ok(())
    }
}

pub(crate) async fn send_verification_code<M: Mailer + Sync>(
    mailer: &M,
    registration: &Registration,
    ttl: Duration,
) -> AuthResult<()> {
    let message = MailMessage {
        to: registration.email.to_string(),
        subject: "Verify your Karma email address".to_string(),
        text: format!(
            "Your Karma verification code is {}. It expires in {} minutes.",
            registration.verification.code,
            ttl.num_minutes()
        ),
    };
    mailer.send(&message).await?;
    Ok(())
}
