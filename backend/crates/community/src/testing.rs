//! In-memory doubles for use case and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use kernel::address::{Address, NewAddress};
use kernel::id::{AddressId, CauseId, IndividualId, NotificationId, OrganisationId, UserId};
use platform::geocode::{GeoPoint, GeocodeError, Geocoder};

use crate::domain::entity::{
    information::Information,
    notification::{NewNotification, Notification},
    profile::{
        Individual, KarmaProfile, NewIndividual, NewOrganisation, Organisation, ProfileCause,
        ProfileEdit, UserAccount,
    },
    settings::Settings,
};
use crate::domain::repository::{
    InformationRepository, NotificationRepository, ProfileRepository, SettingsRepository,
};
use crate::error::{CommunityError, CommunityResult};

#[derive(Default)]
struct State {
    accounts: HashMap<UserId, UserAccount>,
    addresses: Vec<Address>,
    individuals: Vec<Individual>,
    karma: HashMap<IndividualId, KarmaProfile>,
    organisations: Vec<Organisation>,
    causes: Vec<(UserId, ProfileCause)>,
    settings: HashMap<UserId, Settings>,
    notifications: Vec<Notification>,
    information: Vec<Information>,
    writes: usize,
}

#[derive(Clone)]
pub struct MemoryCommunityStore {
    state: Arc<Mutex<State>>,
}

impl Default for MemoryCommunityStore {
    /// Seeded with a `privacyPolicy` information entry.
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                information: vec![Information {
                    kind: "privacyPolicy".into(),
                    content: "Karma respects your privacy.".into(),
                }],
                ..State::default()
            })),
        }
    }
}

pub fn new_address() -> NewAddress {
    NewAddress {
        address_1: "7 Queen Lane".into(),
        address_2: String::new(),
        postcode: "WC2R 2LS".into(),
        city: "London".into(),
        region: String::new(),
        lat: 0.0,
        long: 0.0,
    }
}

pub fn new_individual(user_id: i32, gender: &str) -> NewIndividual {
    NewIndividual {
        user_id: UserId::new(user_id),
        title: "Mx.".into(),
        first_name: "Paul".into(),
        last_name: "Test".into(),
        phone: "07500000000".into(),
        gender: gender.into(),
        birthday: NaiveDate::from_ymd_opt(1990, 5, 17).unwrap(),
        picture_id: None,
    }
}

pub fn new_organisation(user_id: i32) -> NewOrganisation {
    NewOrganisation {
        user_id: UserId::new(user_id),
        name: "WWF".into(),
        org_number: "1081247".into(),
        org_type: "NGO".into(),
        poc_first_name: "Paul".into(),
        poc_last_name: "Test".into(),
        phone: "02070000000".into(),
        low_income: false,
        exempt: false,
        org_register_date: None,
        picture_id: None,
    }
}

impl MemoryCommunityStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, user_id: i32, username: &str) {
        self.lock().accounts.insert(
            UserId::new(user_id),
            UserAccount {
                user_id: UserId::new(user_id),
                username: username.into(),
                email: format!("{username}@karma.com"),
                date_registered: Utc::now(),
            },
        );
    }

    pub fn add_individual_profile(&self, user_id: i32, gender: &str) {
        let mut state = self.lock();
        let address_id = push_address(&mut state, new_address());
        let id = IndividualId::new(state.individuals.len() as i32 + 1);
        state
            .individuals
            .push(new_individual(user_id, gender).into_individual(id, address_id));
        state.karma.insert(id, KarmaProfile::default());
    }

    pub fn add_organisation_profile(&self, user_id: i32) {
        let mut state = self.lock();
        let address_id = push_address(&mut state, new_address());
        let id = OrganisationId::new(state.organisations.len() as i32 + 1);
        state
            .organisations
            .push(new_organisation(user_id).into_organisation(id, address_id));
    }

    pub fn add_profile_cause(&self, user_id: i32, cause_id: i32, name: &str) {
        self.lock().causes.push((
            UserId::new(user_id),
            ProfileCause {
                id: CauseId::new(cause_id),
                name: name.into(),
                title: name.to_uppercase(),
            },
        ));
    }

    pub fn address(&self, address_id: AddressId) -> Option<Address> {
        self.lock()
            .addresses
            .iter()
            .find(|a| a.id == address_id)
            .cloned()
    }

    pub fn individual(&self, user_id: i32) -> Option<(Individual, KarmaProfile)> {
        let state = self.lock();
        let individual = state
            .individuals
            .iter()
            .find(|i| i.user_id.value() == user_id)?
            .clone();
        let karma = state.karma.get(&individual.id).cloned()?;
        Some((individual, karma))
    }

    pub fn karma(&self, individual_id: IndividualId) -> Option<KarmaProfile> {
        self.lock().karma.get(&individual_id).cloned()
    }

    pub fn organisation(&self, user_id: i32) -> Option<Organisation> {
        self.lock()
            .organisations
            .iter()
            .find(|o| o.user_id.value() == user_id)
            .cloned()
    }

    pub fn username(&self, user_id: i32) -> Option<String> {
        self.lock()
            .accounts
            .get(&UserId::new(user_id))
            .map(|a| a.username.clone())
    }

    /// Updates and address inserts made through the repository
    pub fn writes(&self) -> usize {
        self.lock().writes
    }
}

fn push_address(state: &mut State, address: NewAddress) -> AddressId {
    let id = AddressId::new(state.addresses.len() as i32 + 1);
    state.addresses.push(address.into_address(id));
    id
}

impl ProfileRepository for MemoryCommunityStore {
    async fn find_account(&self, user_id: UserId) -> CommunityResult<Option<UserAccount>> {
        Ok(self.lock().accounts.get(&user_id).cloned())
    }

    async fn profile_exists(&self, user_id: UserId) -> CommunityResult<bool> {
        let state = self.lock();
        Ok(state.individuals.iter().any(|i| i.user_id == user_id)
            || state.organisations.iter().any(|o| o.user_id == user_id))
    }

    async fn username_taken(&self, username: &str, except: UserId) -> CommunityResult<bool> {
        Ok(self
            .lock()
            .accounts
            .values()
            .any(|a| a.username == username && a.user_id != except))
    }

    async fn insert_individual(
        &self,
        individual: &NewIndividual,
        address: &NewAddress,
    ) -> CommunityResult<Individual> {
        let mut state = self.lock();
        let address_id = push_address(&mut state, address.clone());
        let id = IndividualId::new(state.individuals.len() as i32 + 1);
        let individual = individual.clone().into_individual(id, address_id);
        state.individuals.push(individual.clone());
        state.karma.insert(id, KarmaProfile::default());
        Ok(individual)
    }

    async fn insert_organisation(
        &self,
        organisation: &NewOrganisation,
        address: &NewAddress,
    ) -> CommunityResult<Organisation> {
        let mut state = self.lock();
        let address_id = push_address(&mut state, address.clone());
        let id = OrganisationId::new(state.organisations.len() as i32 + 1);
        let organisation = organisation.clone().into_organisation(id, address_id);
        state.organisations.push(organisation.clone());
        Ok(organisation)
    }

    async fn find_individual(
        &self,
        user_id: UserId,
    ) -> CommunityResult<Option<(Individual, KarmaProfile)>> {
        Ok(self.individual(user_id.value()))
    }

    async fn find_organisation(&self, user_id: UserId) -> CommunityResult<Option<Organisation>> {
        Ok(self.organisation(user_id.value()))
    }

    async fn find_profile_address(&self, address_id: AddressId) -> CommunityResult<Option<Address>> {
        Ok(self.address(address_id))
    }

    /// Counts one write per changed record. A username held by another
    /// account fails the whole edit, like the unique index does.
    async fn save_profile_edit(&self, user_id: UserId, edit: &ProfileEdit) -> CommunityResult<()> {
        let mut state = self.lock();
        let taken = edit.username.as_ref().is_some_and(|username| {
            state
                .accounts
                .values()
                .any(|a| &a.username == username && a.user_id != user_id)
        });
        if taken {
            return Err(CommunityError::UsernameTaken);
        }

        let moved_to = edit.new_address.clone().map(|address| {
            state.writes += 1;
            push_address(&mut state, address)
        });

        if let Some(individual) = &edit.individual {
            state.writes += 1;
            let mut individual = individual.clone();
            individual.address_id = moved_to.unwrap_or(individual.address_id);
            if let Some(stored) = state.individuals.iter_mut().find(|i| i.id == individual.id) {
                *stored = individual;
            }
        }
        if let Some((individual_id, karma)) = &edit.karma {
            state.writes += 1;
            state.karma.insert(*individual_id, karma.clone());
        }
        if let Some(organisation) = &edit.organisation {
            state.writes += 1;
            let mut organisation = organisation.clone();
            organisation.address_id = moved_to.unwrap_or(organisation.address_id);
            if let Some(stored) = state
                .organisations
                .iter_mut()
                .find(|o| o.id == organisation.id)
            {
                *stored = organisation;
            }
        }
        if let Some(username) = &edit.username {
            state.writes += 1;
            if let Some(account) = state.accounts.get_mut(&user_id) {
                account.username = username.clone();
            }
        }
        Ok(())
    }

    async fn profile_causes(&self, user_id: UserId) -> CommunityResult<Vec<ProfileCause>> {
        Ok(self
            .lock()
            .causes
            .iter()
            .filter(|(user, _)| *user == user_id)
            .map(|(_, cause)| cause.clone())
            .collect())
    }
}

impl SettingsRepository for MemoryCommunityStore {
    async fn find_settings(&self, user_id: UserId) -> CommunityResult<Option<Settings>> {
        Ok(self.lock().settings.get(&user_id).copied())
    }

    async fn save_settings(&self, user_id: UserId, settings: &Settings) -> CommunityResult<()> {
        self.lock().settings.insert(user_id, *settings);
        Ok(())
    }
}

impl NotificationRepository for MemoryCommunityStore {
    async fn unknown_users(&self, user_ids: &[UserId]) -> CommunityResult<Vec<UserId>> {
        let state = self.lock();
        Ok(user_ids
            .iter()
            .filter(|id| !state.accounts.contains_key(*id))
            .copied()
            .collect())
    }

    async fn insert_notifications(
        &self,
        notification: &NewNotification,
        receivers: &[UserId],
    ) -> CommunityResult<Vec<Notification>> {
        let mut state = self.lock();
        let mut created = Vec::with_capacity(receivers.len());
        for receiver in receivers {
            let id = NotificationId::new(state.notifications.len() as i32 + 1);
            let row = notification.for_receiver(id, *receiver);
            state.notifications.push(row.clone());
            created.push(row);
        }
        Ok(created)
    }

    async fn notifications_for(&self, receiver_id: UserId) -> CommunityResult<Vec<Notification>> {
        let mut received: Vec<Notification> = self
            .lock()
            .notifications
            .iter()
            .filter(|n| n.receiver_id == receiver_id)
            .cloned()
            .collect();
        received.sort_by(|a, b| b.timestamp_sent.cmp(&a.timestamp_sent).then(b.id.cmp(&a.id)));
        Ok(received)
    }
}

impl InformationRepository for MemoryCommunityStore {
    async fn find_information(&self, kind: &str) -> CommunityResult<Option<Information>> {
        Ok(self
            .lock()
            .information
            .iter()
            .find(|i| i.kind == kind)
            .cloned())
    }
}

#[derive(Clone, Default)]
pub struct FixedGeocoder(pub Option<GeoPoint>);

impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Ok(self.0)
    }
}
