//! Verify Email Use Case
//!
//! Confirms the emailed verification code, or sends a fresh one.

use std::sync::Arc;

use chrono::Utc;
use platform::mail::Mailer;

use crate::application::config::AuthConfig;
use crate::application::sign_in_email::send_verification_code;
use crate::domain::entity::registration::Registration;
use crate::domain::repository::RegistrationRepository;
use crate::domain::value_object::{
    email::Email,
    one_time_code::{OneTimeCode, check_code},
};
use crate::error::{AuthError, AuthResult};

pub struct VerifyEmailUseCase<R, M>
where
    R: RegistrationRepository,
    M: Mailer,
{
    repo: Arc<R>,
    mailer: Arc<M>,
    config: Arc<AuthConfig>,
}

impl<R, M> VerifyEmailUseCase<R, M>
where
    R: RegistrationRepository + Sync,
    M: Mailer + Sync,
{
    pub fn new(repo: Arc<R>, mailer: Arc<M>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            mailer,
            config,
        }
    }

    pub async fn execute(&self, email: &str, token: Option<&str>) -> AuthResult<()> {
        let email = Email::new(email)?;
        let registration = self.repo.find_registration(&email).await?;

        check_code(
            registration.as_ref().map(|r| &r.verification),
            token,
            email.as_str(),
            Utc::now(),
        )?;

        // check_code only succeeds when a registration was found
        let Some(mut registration) = registration else {
            return Err(AuthError::NoCodeSent(email.to_string()));
        };
        registration.mark_verified();
        self.repo.save_registration(&registration).await?;

        tracing::info!(email = %email, "Email verified");
        Ok(())
    }

    /// Replace the verification code and mail it again.
    pub async fn resend(&self, email: &str) -> AuthResult<()> {
        let email = Email::new(email)?;
        let ttl = self.config.verification_code_ttl();
        let code = OneTimeCode::generate(ttl);

        let registration = match self.repo.find_registration(&email).await? {
            Some(r) if r.email_flag => return Err(AuthError::EmailAlreadyVerified),
            Some(mut r) => {
                r.verification = code;
                r
            }
            None => Registration::new(email, code),
        };

        self.repo.save_registration(&registration).await?;
        send_verification_code(self.mailer.as_ref(), &registration, ttl).await?;

        tracing::info!(email = %registration.email, "Verification code resent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryAuthStore, RecordingMailer};

    fn use_case(
        store: &MemoryAuthStore,
        mailer: &RecordingMailer,
    ) -> VerifyEmailUseCase<MemoryAuthStore, RecordingMailer> {
        VerifyEmailUseCase::new(
            Arc::new(store.clone()),
            Arc::new(mailer.clone()),
            Arc::new(AuthConfig::development()),
        )
    }

    #[tokio::test]
    async fn test_verify_with_mailed_code() {
        let store = MemoryAuthStore::default();
        let mailer = RecordingMailer::default();
        let uc = use_case(&store, &mailer);

        uc.resend("paul@karma.com").await.unwrap();
        let code = mailer.last_code_for("paul@karma.com").unwrap();

        uc.execute("paul@karma.com", Some(&code)).await.unwrap();
        assert!(store.registration("paul@karma.com").unwrap().email_flag);
    }

    #[tokio::test]
    async fn test_wrong_or_missing_code() {
        let store = MemoryAuthStore::default();
        let mailer = RecordingMailer::default();
        let uc = use_case(&store, &mailer);

        assert!(matches!(
            uc.execute("paul@karma.com", Some("123456")).await,
            Err(AuthError::NoCodeSent(_))
        ));

        uc.resend("paul@karma.com").await.unwrap();
        let code = mailer.last_code_for("paul@karma.com").unwrap();
        let wrong = if code == "000000" { "111111" } else { "000000" };

        assert!(matches!(
            uc.execute("paul@karma.com", None).await,
            Err(AuthError::CodeMissing)
        ));
        assert!(matches!(
            uc.execute("paul@karma.com", Some(wrong)).await,
            Err(AuthError::CodeMismatch)
        ));
        assert!(!store.registration("paul@karma.com").unwrap().email_flag);
    }

    #[tokio::test]
    async fn test_resend_replaces_code() {
        let store = MemoryAuthStore::default();
        let mailer = RecordingMailer::default();
        let uc = use_case(&store, &mailer);

        uc.resend("paul@karma.com").await.unwrap();
        uc.resend("paul@karma.com").await.unwrap();

        let latest = mailer.last_code_for("paul@karma.com").unwrap();
        assert_eq!(store.registration("paul@karma.com").unwrap().verification.code, latest);
        assert_eq!(mailer.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_resend_after_verification_rejected() {
        let store = MemoryAuthStore::default();
        let mailer = RecordingMailer::default();
        let uc = use_case(&store, &mailer);

        uc.resend("paul@karma.com").await.unwrap();
        let code = mailer.last_code_for("paul@karma.com").unwrap();
        uc.execute("paul@karma.com", Some(&code)).await.unwrap();

        assert!(matches!(
            uc.resend("paul@karma.com").await,
            Err(AuthError::EmailAlreadyVerified)
        ));
    }
}
