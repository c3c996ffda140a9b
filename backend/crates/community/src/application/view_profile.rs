//! View Profile Use Case

use std::sync::Arc;

use kernel::address::Address;
use kernel::id::{AddressId, UserId};

use crate::domain::entity::profile::{IndividualView, OrganisationView, ProfileView};
use crate::domain::repository::ProfileRepository;
use crate::error::{CommunityError, CommunityResult};

pub struct ViewProfileUseCase<R>
where
    R: ProfileRepository,
{
    repo: Arc<R>,
}

impl<R> ViewProfileUseCase<R>
where
    R: ProfileRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The caller's profile, or another user's when `other_user_id` is given.
    pub async fn execute(
        &self,
        caller: UserId,
        other_user_id: Option<&str>,
    ) -> CommunityResult<ProfileView> {
        let user_id = match other_user_id {
            Some(raw) => raw
                .trim()
                .parse::<UserId>()
                .map_err(|_| CommunityError::InvalidUserId)?,
            None => caller,
        };

        let user = self
            .repo
            .find_account(user_id)
            .await?
            .ok_or(CommunityError::UserNotFound)?;
        let causes = self.repo.profile_causes(user_id).await?;

        if let Some((individual, karma)) = self.repo.find_individual(user_id).await? {
            let address = self.address(individual.address_id).await?;
            return Ok(ProfileView {
                user,
                individual: Some(IndividualView::new(individual, karma, address)),
                organisation: None,
                causes,
            });
        }

        if let Some(organisation) = self.repo.find_organisation(user_id).await? {
            let address = self.address(organisation.address_id).await?;
            return Ok(ProfileView {
                user,
                individual: None,
                organisation: Some(OrganisationView::new(organisation, address)),
                causes,
            });
        }

        Err(CommunityError::NoProfile)
    }

    async fn address(&self, address_id: AddressId) -> CommunityResult<Address> {
        self.repo
            .find_profile_address(address_id)
            .await?
            .ok_or_else(|| CommunityError::Internal(format!("Address {address_id} is missing")))
    }
}
