//! Cause Use Cases

use std::sync::Arc;

use kernel::id::{CauseId, UserId};

use crate::domain::entity::cause::Cause;
use crate::domain::repository::CauseRepository;
use crate::error::{ActivityError, ActivityResult};

pub struct CauseUseCase<R>
where
    R: CauseRepository,
{
    repo: Arc<R>,
}

impl<R> CauseUseCase<R>
where
    R: CauseRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> ActivityResult<Vec<Cause>> {
        self.repo.list_causes().await
    }

    /// Look a cause up by its id as it appears in the path
    pub async fn get(&self, raw_id: &str) -> ActivityResult<Cause> {
        let id: CauseId = raw_id.parse().map_err(|_| ActivityError::InvalidCauseId)?;
        self.repo
            .find_cause(id)
            .await?
            .ok_or(ActivityError::CauseNotFound)
    }

    pub async fn selected(&self, user_id: UserId) -> ActivityResult<Vec<Cause>> {
        self.repo.selected_causes(user_id).await
    }

    /// Replace the user's selection, returning the selected causes
    pub async fn select(&self, user_id: UserId, ids: &[CauseId]) -> ActivityResult<Vec<Cause>> {
        if ids.is_empty() {
            return Err(ActivityError::NoCausesSpecified);
        }

        let known = self.repo.list_causes().await?;
        let mut unique: Vec<CauseId> = Vec::with_capacity(ids.len());
        for id in ids {
            if !known.iter().any(|cause| cause.id == *id) {
                return Err(ActivityError::UnknownCause(id.value()));
            }
            if !unique.contains(id) {
                unique.push(*id);
            }
        }

        self.repo.replace_selected_causes(user_id, &unique).await?;

        tracing::info!(user_id = %user_id, count = unique.len(), "Causes selected");
        Ok(known
            .into_iter()
            .filter(|cause| unique.contains(&cause.id))
            .collect())
    }
}
