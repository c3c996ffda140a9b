//! Settings Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::settings::Settings;
use crate::domain::repository::SettingsRepository;
use crate::error::{CommunityError, CommunityResult};

pub struct SettingsUseCase<R>
where
    R: SettingsRepository,
{
    repo: Arc<R>,
}

impl<R> SettingsUseCase<R>
where
    R: SettingsRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Users without a settings row get everything switched off.
    pub async fn get(&self, user_id: UserId) -> CommunityResult<Settings> {
        Ok(self.repo.find_settings(user_id).await?.unwrap_or_default())
    }

    pub async fn update(
        &self,
        user_id: UserId,
        email: Option<i16>,
        notifications: Option<i16>,
    ) -> CommunityResult<Settings> {
        let settings = self
            .get(user_id)
            .await?
            .with_changes(email, notifications)
            .ok_or(CommunityError::InvalidSettings)?;
        self.repo.save_settings(user_id, &settings).await?;

        tracing::debug!(user_id = %user_id, email = settings.email, notifications = settings.notifications, "Settings changed");
        Ok(settings)
    }
}
