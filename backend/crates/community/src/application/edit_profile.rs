//! Edit Profile Use Case
//!
//! Partial update of the username and of the individual or organisation
//! profile. Every change is checked first, then the changed records are
//! saved in one transaction. Records that end up unchanged are not written.

use std::sync::Arc;

use kernel::address::{Address, NewAddress};
use kernel::id::{AddressId, UserId};
use kernel::username::Username;
use platform::geocode::Geocoder;

use crate::application::register_profile::geocoded;
use crate::domain::entity::profile::{AddressChange, ProfileEdit};
use crate::domain::repository::ProfileRepository;
use crate::error::{CommunityError, CommunityResult};

#[derive(Debug, Clone, Default)]
pub struct IndividualChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub women_only: Option<bool>,
    pub address: Option<AddressChange>,
}

#[derive(Debug, Clone, Default)]
pub struct OrganisationChanges {
    pub name: Option<String>,
    pub org_number: Option<String>,
    pub org_type: Option<String>,
    pub poc_first_name: Option<String>,
    pub poc_last_name: Option<String>,
    pub phone: Option<String>,
    pub low_income: Option<bool>,
    pub exempt: Option<bool>,
    pub address: Option<AddressChange>,
}

#[derive(Debug, Clone, Default)]
pub struct EditProfileInput {
    pub username: Option<String>,
    /// Ignored when `individual` is present
    pub individual: Option<IndividualChanges>,
    pub organisation: Option<OrganisationChanges>,
}

pub struct EditProfileUseCase<R, G>
where
    R: ProfileRepository,
    G: Geocoder,
{
    repo: Arc<R>,
    geocoder: Arc<G>,
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl<R, G> EditProfileUseCase<R, G>
where
    R: ProfileRepository + Sync,
    G: Geocoder + Sync,
{
    pub fn new(repo: Arc<R>, geocoder: Arc<G>) -> Self {
        Self { repo, geocoder }
    }

    pub async fn execute(&self, user_id: UserId, input: EditProfileInput) -> CommunityResult<()> {
        let account = self
            .repo
            .find_account(user_id)
            .await?
            .ok_or(CommunityError::UserNotFound)?;

        let mut edit = ProfileEdit::default();
        if let Some(raw) = input.username {
            let username = Username::new(&raw)?;
            if username.as_str() != account.username {
                if self.repo.username_taken(username.as_str(), user_id).await? {
                    return Err(CommunityError::UsernameTaken);
                }
                edit.username = Some(username.to_string());
            }
        }

        if let Some(changes) = input.individual {
            self.edit_individual(user_id, changes, &mut edit).await?;
        } else if let Some(changes) = input.organisation {
            self.edit_organisation(user_id, changes, &mut edit).await?;
        }

        if edit.is_empty() {
            tracing::debug!(user_id = %user_id, "Profile edit changed nothing");
            return Ok(());
        }

        self.repo.save_profile_edit(user_id, &edit).await?;
        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(())
    }

    async fn edit_individual(
        &self,
        user_id: UserId,
        changes: IndividualChanges,
        edit: &mut ProfileEdit,
    ) -> CommunityResult<()> {
        let (stored, stored_karma) = self
            .repo
            .find_individual(user_id)
            .await?
            .ok_or(CommunityError::NoProfile)?;
        let mut individual = stored.clone();
        let mut karma = stored_karma.clone();

        set(&mut individual.first_name, changes.first_name);
        set(&mut individual.last_name, changes.last_name);
        set(&mut individual.phone, changes.phone);
        set(&mut individual.gender, changes.gender);
        set(&mut karma.bio, changes.bio);
        if let Some(women_only) = changes.women_only {
            if !individual.is_female() {
                return Err(CommunityError::WomenOnlyRestricted);
            }
            karma.women_only = women_only;
        }

        if let Some(change) = changes.address {
            edit.new_address = self.moved_address(individual.address_id, &change).await?;
        }

        if karma != stored_karma {
            edit.karma = Some((individual.id, karma));
        }
        if individual != stored || edit.new_address.is_some() {
            edit.individual = Some(individual);
        }
        Ok(())
    }

    async fn edit_organisation(
        &self,
        user_id: UserId,
        changes: OrganisationChanges,
        edit: &mut ProfileEdit,
    ) -> CommunityResult<()> {
        let stored = self
            .repo
            .find_organisation(user_id)
            .await?
            .ok_or(CommunityError::NoProfile)?;
        let mut organisation = stored.clone();

        set(&mut organisation.name, changes.name);
        set(&mut organisation.org_number, changes.org_number);
        set(&mut organisation.org_type, changes.org_type);
        set(&mut organisation.poc_first_name, changes.poc_first_name);
        set(&mut organisation.poc_last_name, changes.poc_last_name);
        set(&mut organisation.phone, changes.phone);
        set(&mut organisation.low_income, changes.low_income);
        set(&mut organisation.exempt, changes.exempt);

        if let Some(change) = changes.address {
            edit.new_address = self.moved_address(organisation.address_id, &change).await?;
        }

        if organisation != stored || edit.new_address.is_some() {
            edit.organisation = Some(organisation);
        }
        Ok(())
    }

    /// A changed address becomes a new, geocoded row; old rows may still be
    /// referenced by events.
    async fn moved_address(
        &self,
        current: AddressId,
        change: &AddressChange,
    ) -> CommunityResult<Option<NewAddress>> {
        let stored: Address = self
            .repo
            .find_profile_address(current)
            .await?
            .ok_or_else(|| CommunityError::Internal(format!("Address {current} is missing")))?;

        match change.apply_to(&stored) {
            Some(edited) => {
                edited.validate()?;
                Ok(Some(geocoded(self.geocoder.as_ref(), edited).await))
            }
            None => Ok(None),
        }
    }
}
