//! Change Password Use Case

use std::sync::Arc;

use kernel::id::UserId;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::domain::services::choose_password;
use crate::error::{AuthError, AuthResult};

pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

pub struct ChangePasswordUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ChangePasswordUseCase<U>
where
    U: UserRepository + Sync,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Checks run in order: confirmation, strength, old password.
    pub async fn execute(&self, user_id: UserId, input: ChangePasswordInput) -> AuthResult<()> {
        let new_password = choose_password(
            input.new_password,
            &input.confirm_password,
            self.config.enforce_password_strength,
        )?;

        let user = self
            .user_repo
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let old_password = ClearTextPassword::new(input.old_password)
            .map_err(|_| AuthError::IncorrectOldPassword)?;
        if !user.password_hash.verify(&old_password, self.config.pepper()) {
            return Err(AuthError::IncorrectOldPassword);
        }

        let password_hash = new_password.hash(self.config.pepper())?;
        self.user_repo
            .update_password_hash(user.id, &password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }
}
