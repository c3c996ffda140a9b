//! In-memory doubles for use case and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use kernel::address::{Address, Coordinates, NewAddress};
use kernel::id::{AddressId, CauseId, EventId, IndividualId, UserId};
use platform::geocode::{GeoPoint, GeocodeError, Geocoder};

use crate::domain::entity::{
    cause::Cause,
    event::{CreationLimit, Event, EventDraft, EventSummary, NewEvent},
    signup::{Attendee, Participant, SignUp},
};
use crate::domain::repository::{
    CauseRepository, EventRepository, EventScope, EventSelection, FavouriteRepository,
    SignUpRepository,
};
use crate::error::{ActivityError, ActivityResult};

#[derive(Default)]
struct State {
    participants: HashMap<UserId, Participant>,
    addresses: Vec<Address>,
    events: Vec<Event>,
    event_causes: Vec<(EventId, CauseId)>,
    signups: Vec<SignUp>,
    favourites: Vec<(IndividualId, EventId)>,
    causes: Vec<Cause>,
    selected: Vec<(UserId, CauseId)>,
}

#[derive(Clone)]
pub struct MemoryActivityStore {
    state: Arc<Mutex<State>>,
}

impl Default for MemoryActivityStore {
    /// Seeded with the causes `animals` (1), `poverty` (2) and `education` (3).
    fn default() -> Self {
        let causes = ["animals", "poverty", "education"]
            .iter()
            .zip(1..)
            .map(|(name, id)| Cause {
                id: CauseId::new(id),
                name: name.to_string(),
                title: name.to_uppercase(),
                description: format!("All about {name}"),
            })
            .collect();

        Self {
            state: Arc::new(Mutex::new(State {
                causes,
                ..State::default()
            })),
        }
    }
}

pub fn draft(days_from_now: i64) -> EventDraft {
    EventDraft {
        name: format!("Event in {days_from_now} days"),
        women_only: false,
        spots: 3,
        address_visible: true,
        minimum_age: 16,
        photo_id: false,
        physical: true,
        add_info: false,
        content: "Bring gloves".into(),
        date: Utc::now() + Duration::days(days_from_now),
    }
}

pub fn new_address(lat: f64, long: f64) -> NewAddress {
    NewAddress {
        address_1: "Strand".into(),
        address_2: String::new(),
        postcode: "WC2R 2LS".into(),
        city: "London".into(),
        region: String::new(),
        lat,
        long,
    }
}

impl MemoryActivityStore {
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_individual(&self, user_id: i32, individual_id: i32, location: Option<(f64, f64)>) {
        self.lock().participants.insert(
            UserId::new(user_id),
            Participant {
                user_id: UserId::new(user_id),
                individual_id: Some(IndividualId::new(individual_id)),
                location: location.map(|(lat, long)| Coordinates { lat, long }),
            },
        );
    }

    pub fn add_organisation(&self, user_id: i32, location: Option<(f64, f64)>) {
        self.lock().participants.insert(
            UserId::new(user_id),
            Participant {
                user_id: UserId::new(user_id),
                individual_id: None,
                location: location.map(|(lat, long)| Coordinates { lat, long }),
            },
        );
    }

    /// Insert an event directly, bypassing limits and geocoding.
    pub fn add_event(
        &self,
        creator: i32,
        days_from_now: i64,
        at: (f64, f64),
        causes: &[i32],
    ) -> EventId {
        let mut state = self.lock();
        let address_id = AddressId::new(state.addresses.len() as i32 + 1);
        state
            .addresses
            .push(new_address(at.0, at.1).into_address(address_id));

        let event_id = EventId::new(state.events.len() as i32 + 1);
        let event = NewEvent {
            draft: draft(days_from_now),
            address_id,
            user_id: UserId::new(creator),
            creation_date: Utc::now(),
        }
        .into_event(event_id);
        state.events.push(event);
        for cause in causes {
            state.event_causes.push((event_id, CauseId::new(*cause)));
        }
        event_id
    }

    pub fn select_causes(&self, user_id: i32, causes: &[i32]) {
        let mut state = self.lock();
        for cause in causes {
            state.selected.push((UserId::new(user_id), CauseId::new(*cause)));
        }
    }

    pub fn event(&self, event_id: EventId) -> Option<Event> {
        self.lock().events.iter().find(|e| e.id == event_id).cloned()
    }

    pub fn address(&self, address_id: AddressId) -> Option<Address> {
        self.lock()
            .addresses
            .iter()
            .find(|a| a.id == address_id)
            .cloned()
    }

    pub fn event_count(&self) -> usize {
        self.lock().events.len()
    }

    pub fn linked_causes(&self, event_id: EventId) -> Vec<CauseId> {
        self.lock()
            .event_causes
            .iter()
            .filter(|(e, _)| *e == event_id)
            .map(|(_, c)| *c)
            .collect()
    }

    pub fn signups(&self) -> Vec<SignUp> {
        self.lock().signups.clone()
    }

    pub fn favourites(&self) -> Vec<(IndividualId, EventId)> {
        self.lock().favourites.clone()
    }

    pub fn selected(&self, user_id: i32) -> Vec<CauseId> {
        self.lock()
            .selected
            .iter()
            .filter(|(user, _)| user.value() == user_id)
            .map(|(_, cause)| *cause)
            .collect()
    }
}

fn summarize(state: &State, event: &Event) -> Option<EventSummary> {
    let address = state
        .addresses
        .iter()
        .find(|a| a.id == event.address_id)?
        .clone();
    Some(EventSummary {
        event: event.clone(),
        address,
        volunteers: state
            .signups
            .iter()
            .filter(|s| s.event_id == event.id)
            .map(|s| s.individual_id)
            .collect(),
        favourited_by: state
            .favourites
            .iter()
            .filter(|(_, e)| *e == event.id)
            .map(|(i, _)| *i)
            .collect(),
        causes: state
            .event_causes
            .iter()
            .filter(|(e, _)| *e == event.id)
            .map(|(_, c)| *c)
            .collect(),
    })
}

fn in_scope(state: &State, scope: EventScope, event_id: EventId) -> bool {
    match scope {
        EventScope::All => true,
        EventScope::SelectedCauses(user_id) => state.event_causes.iter().any(|(e, c)| {
            *e == event_id && state.selected.iter().any(|(u, s)| *u == user_id && s == c)
        }),
        EventScope::FavouritedBy(individual_id) => state
            .favourites
            .iter()
            .any(|(i, e)| *i == individual_id && *e == event_id),
        EventScope::SignedUpBy(individual_id) => state
            .signups
            .iter()
            .any(|s| s.individual_id == individual_id && s.event_id == event_id),
        EventScope::AttendedBy(individual_id) => state.signups.iter().any(|s| {
            s.individual_id == individual_id && s.event_id == event_id && s.attended
        }),
    }
}

impl EventRepository for MemoryActivityStore {
    async fn find_participant(&self, user_id: UserId) -> ActivityResult<Option<Participant>> {
        Ok(self.lock().participants.get(&user_id).cloned())
    }

    async fn count_events_created_since(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> ActivityResult<usize> {
        Ok(self
            .lock()
            .events
            .iter()
            .filter(|e| e.user_id == user_id && e.creation_date > since)
            .count())
    }

    async fn insert_address(&self, address: &NewAddress) -> ActivityResult<Address> {
        let mut state = self.lock();
        let address = address
            .clone()
            .into_address(AddressId::new(state.addresses.len() as i32 + 1));
        state.addresses.push(address.clone());
        Ok(address)
    }

    async fn find_address(&self, address_id: AddressId) -> ActivityResult<Option<Address>> {
        Ok(self.address(address_id))
    }

    async fn update_address(&self, address: &Address) -> ActivityResult<()> {
        let mut state = self.lock();
        if let Some(stored) = state.addresses.iter_mut().find(|a| a.id == address.id) {
            *stored = address.clone();
        }
        Ok(())
    }

    async fn insert_event(
        &self,
        event: &NewEvent,
        causes: &[CauseId],
        limit: Option<CreationLimit>,
    ) -> ActivityResult<Event> {
        let mut state = self.lock();
        if let Some(limit) = limit {
            let created = state
                .events
                .iter()
                .filter(|e| e.user_id == event.user_id && e.creation_date > limit.since)
                .count();
            if created >= limit.max {
                return Err(ActivityError::CreationLimitReached(limit.max));
            }
        }
        let event = event
            .clone()
            .into_event(EventId::new(state.events.len() as i32 + 1));
        state.events.push(event.clone());
        for cause in causes {
            state.event_causes.push((event.id, *cause));
        }
        Ok(event)
    }

    async fn find_event(&self, event_id: EventId) -> ActivityResult<Option<Event>> {
        Ok(self.event(event_id))
    }

    async fn update_event(&self, event: &Event) -> ActivityResult<()> {
        let mut state = self.lock();
        if let Some(stored) = state.events.iter_mut().find(|e| e.id == event.id) {
            *stored = event.clone();
        }
        Ok(())
    }

    async fn delete_event(&self, event_id: EventId) -> ActivityResult<()> {
        let mut state = self.lock();
        state.event_causes.retain(|(e, _)| *e != event_id);
        state.signups.retain(|s| s.event_id != event_id);
        state.favourites.retain(|(_, e)| *e != event_id);
        state.events.retain(|e| e.id != event_id);
        Ok(())
    }

    async fn list_events(&self, selection: &EventSelection) -> ActivityResult<Vec<EventSummary>> {
        let state = self.lock();
        let mut events: Vec<EventSummary> = state
            .events
            .iter()
            .filter(|e| selection.in_timeframe(e.date))
            .filter(|e| selection.filters.matches(e))
            .filter(|e| in_scope(&state, selection.scope, e.id))
            .filter_map(|e| summarize(&state, e))
            .collect();
        events.sort_by_key(|s| s.event.date);
        Ok(events)
    }

    async fn event_causes(&self, event_id: EventId) -> ActivityResult<Vec<Cause>> {
        let state = self.lock();
        Ok(state
            .causes
            .iter()
            .filter(|c| state.event_causes.contains(&(event_id, c.id)))
            .cloned()
            .collect())
    }

    async fn count_signups(&self, event_id: EventId) -> ActivityResult<usize> {
        Ok(self
            .lock()
            .signups
            .iter()
            .filter(|s| s.event_id == event_id)
            .count())
    }
}

impl SignUpRepository for MemoryActivityStore {
    async fn insert_signup(&self, signup: &SignUp) -> ActivityResult<()> {
        self.lock().signups.push(*signup);
        Ok(())
    }

    async fn find_signup(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<Option<SignUp>> {
        Ok(self
            .lock()
            .signups
            .iter()
            .find(|s| s.individual_id == individual_id && s.event_id == event_id)
            .copied())
    }

    async fn update_signup(&self, signup: &SignUp) -> ActivityResult<()> {
        let mut state = self.lock();
        if let Some(stored) = state.signups.iter_mut().find(|s| {
            s.individual_id == signup.individual_id && s.event_id == signup.event_id
        }) {
            *stored = *signup;
        }
        Ok(())
    }

    async fn delete_signup(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<bool> {
        let mut state = self.lock();
        let before = state.signups.len();
        state
            .signups
            .retain(|s| !(s.individual_id == individual_id && s.event_id == event_id));
        Ok(state.signups.len() != before)
    }

    async fn list_attendees(&self, event_id: EventId) -> ActivityResult<Vec<Attendee>> {
        let state = self.lock();
        Ok(state
            .signups
            .iter()
            .filter(|s| s.event_id == event_id)
            .filter_map(|s| {
                let participant = state
                    .participants
                    .values()
                    .find(|p| p.individual_id == Some(s.individual_id))?;
                Some(Attendee {
                    individual_id: s.individual_id,
                    user_id: participant.user_id,
                    username: format!("user{}", participant.user_id),
                    email: format!("user{}@karma.com", participant.user_id),
                    first_name: "Paul".into(),
                    last_name: format!("Volunteer {}", s.individual_id),
                    phone: "07500000000".into(),
                    confirmed: s.confirmed,
                    attended: s.attended,
                })
            })
            .collect())
    }
}

impl FavouriteRepository for MemoryActivityStore {
    async fn insert_favourite(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<()> {
        let mut state = self.lock();
        if !state.favourites.contains(&(individual_id, event_id)) {
            state.favourites.push((individual_id, event_id));
        }
        Ok(())
    }

    async fn delete_favourite(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<bool> {
        let mut state = self.lock();
        let before = state.favourites.len();
        state.favourites.retain(|f| *f != (individual_id, event_id));
        Ok(state.favourites.len() != before)
    }
}

impl CauseRepository for MemoryActivityStore {
    async fn list_causes(&self) -> ActivityResult<Vec<Cause>> {
        Ok(self.lock().causes.clone())
    }

    async fn find_cause(&self, cause_id: CauseId) -> ActivityResult<Option<Cause>> {
        Ok(self.lock().causes.iter().find(|c| c.id == cause_id).cloned())
    }

    async fn selected_causes(&self, user_id: UserId) -> ActivityResult<Vec<Cause>> {
        let state = self.lock();
        Ok(state
            .causes
            .iter()
            .filter(|c| state.selected.contains(&(user_id, c.id)))
            .cloned()
            .collect())
    }

    async fn replace_selected_causes(
        &self,
        user_id: UserId,
        causes: &[CauseId],
    ) -> ActivityResult<()> {
        let mut state = self.lock();
        state.selected.retain(|(u, _)| *u != user_id);
        for cause in causes {
            state.selected.push((user_id, *cause));
        }
        Ok(())
    }
}

/// Geocoder that always answers with the same point.
#[derive(Clone, Default)]
pub struct FixedGeocoder(pub Option<GeoPoint>);

impl Geocoder for FixedGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        Ok(self.0)
    }
}
