//! Repository Traits
//!
//! Method names are unique across traits because the Postgres repository
//! implements all of them on one type.

use kernel::address::{Address, NewAddress};
use kernel::id::{AddressId, UserId};

use crate::domain::entity::{
    information::Information,
    notification::{NewNotification, Notification},
    profile::{
        Individual, KarmaProfile, NewIndividual, NewOrganisation, Organisation, ProfileCause,
        ProfileEdit, UserAccount,
    },
    settings::Settings,
};
use crate::error::CommunityResult;

#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    async fn find_account(&self, user_id: UserId) -> CommunityResult<Option<UserAccount>>;

    /// True when the user already has an individual or organisation row
    async fn profile_exists(&self, user_id: UserId) -> CommunityResult<bool>;

    async fn username_taken(&self, username: &str, except: UserId) -> CommunityResult<bool>;

    /// Inserts the address, the individual and an empty karma profile together
    async fn insert_individual(
        &self,
        individual: &NewIndividual,
        address: &NewAddress,
    ) -> CommunityResult<Individual>;

    /// Inserts the address and the organisation together
    async fn insert_organisation(
        &self,
        organisation: &NewOrganisation,
        address: &NewAddress,
    ) -> CommunityResult<Organisation>;

    async fn find_individual(
        &self,
        user_id: UserId,
    ) -> CommunityResult<Option<(Individual, KarmaProfile)>>;

    async fn find_organisation(&self, user_id: UserId) -> CommunityResult<Option<Organisation>>;

    async fn find_profile_address(&self, address_id: AddressId) -> CommunityResult<Option<Address>>;

    /// Applies every part of the edit in one transaction
    async fn save_profile_edit(&self, user_id: UserId, edit: &ProfileEdit) -> CommunityResult<()>;

    async fn profile_causes(&self, user_id: UserId) -> CommunityResult<Vec<ProfileCause>>;
}

#[trait_variant::make(SettingsRepository: Send)]
pub trait LocalSettingsRepository {
    async fn find_settings(&self, user_id: UserId) -> CommunityResult<Option<Settings>>;

    /// Insert or replace
    async fn save_settings(&self, user_id: UserId, settings: &Settings) -> CommunityResult<()>;
}

#[trait_variant::make(NotificationRepository: Send)]
pub trait LocalNotificationRepository {
    /// Ids among `user_ids` with no user row
    async fn unknown_users(&self, user_ids: &[UserId]) -> CommunityResult<Vec<UserId>>;

    /// One row per receiver, in one transaction
    async fn insert_notifications(
        &self,
        notification: &NewNotification,
        receivers: &[UserId],
    ) -> CommunityResult<Vec<Notification>>;

    /// Newest first
    async fn notifications_for(&self, receiver_id: UserId) -> CommunityResult<Vec<Notification>>;
}

#[trait_variant::make(InformationRepository: Send)]
pub trait LocalInformationRepository {
    async fn find_information(&self, kind: &str) -> CommunityResult<Option<Information>>;
}

/// Everything the community handlers need from storage
pub trait CommunityStore:
    ProfileRepository
    + SettingsRepository
    + NotificationRepository
    + InformationRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> CommunityStore for T where
    T: ProfileRepository
        + SettingsRepository
        + NotificationRepository
        + InformationRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
