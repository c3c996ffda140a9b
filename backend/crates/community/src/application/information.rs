//! Information Use Case

use std::sync::Arc;

use crate::domain::entity::information::Information;
use crate::domain::repository::InformationRepository;
use crate::error::{CommunityError, CommunityResult};

pub struct InformationUseCase<R>
where
    R: InformationRepository,
{
    repo: Arc<R>,
}

impl<R> InformationUseCase<R>
where
    R: InformationRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, kind: Option<&str>) -> CommunityResult<Information> {
        let kind = kind
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(CommunityError::InformationTypeMissing)?;
        self.repo
            .find_information(kind)
            .await?
            .ok_or(CommunityError::InformationNotFound)
    }
}
