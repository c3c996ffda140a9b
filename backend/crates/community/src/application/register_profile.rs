//! Register Profile Use Case
//!
//! Completes a signed-in user account with an individual or organisation
//! profile. A user gets at most one of the two.

use std::sync::Arc;

use kernel::address::{Coordinates, NewAddress};
use kernel::id::UserId;
use platform::geocode::{Geocoder, locate_or_origin};

use crate::domain::entity::profile::{Individual, NewIndividual, NewOrganisation, Organisation};
use crate::domain::repository::ProfileRepository;
use crate::error::{CommunityError, CommunityResult};

pub struct RegisterProfileUseCase<R, G>
where
    R: ProfileRepository,
    G: Geocoder,
{
    repo: Arc<R>,
    geocoder: Arc<G>,
}

impl<R, G> RegisterProfileUseCase<R, G>
where
    R: ProfileRepository + Sync,
    G: Geocoder + Sync,
{
    pub fn new(repo: Arc<R>, geocoder: Arc<G>) -> Self {
        Self { repo, geocoder }
    }

    pub async fn individual(
        &self,
        individual: NewIndividual,
        address: NewAddress,
    ) -> CommunityResult<Individual> {
        individual.validate()?;
        address.validate()?;
        self.ensure_unregistered(individual.user_id).await?;

        let address = geocoded(self.geocoder.as_ref(), address).await;
        let individual = self.repo.insert_individual(&individual, &address).await?;

        tracing::info!(user_id = %individual.user_id, individual_id = %individual.id, "Individual registered");
        Ok(individual)
    }

    pub async fn organisation(
        &self,
        organisation: NewOrganisation,
        address: NewAddress,
    ) -> CommunityResult<Organisation> {
        organisation.validate()?;
        address.validate()?;
        self.ensure_unregistered(organisation.user_id).await?;

        let address = geocoded(self.geocoder.as_ref(), address).await;
        let organisation = self.repo.insert_organisation(&organisation, &address).await?;

        tracing::info!(user_id = %organisation.user_id, organisation_id = %organisation.id, "Organisation registered");
        Ok(organisation)
    }

    async fn ensure_unregistered(&self, user_id: UserId) -> CommunityResult<()> {
        if self.repo.find_account(user_id).await?.is_none() {
            return Err(CommunityError::UserNotFound);
        }
        if self.repo.profile_exists(user_id).await? {
            return Err(CommunityError::AlreadyRegistered);
        }
        Ok(())
    }
}

/// Fill in coordinates from the geocoder, `(0, 0)` when it finds nothing.
pub(crate) async fn geocoded<G: Geocoder + Sync>(geocoder: &G, address: NewAddress) -> NewAddress {
    let point = locate_or_origin(geocoder, &address.one_line()).await;
    address.with_coordinates(Coordinates {
        lat: point.lat,
        long: point.long,
    })
}
