//! Repository Traits
//!
//! Method names are unique across traits because the Postgres repository
//! implements all of them on one type.

use chrono::{DateTime, Utc};
use kernel::address::{Address, NewAddress};
use kernel::id::{AddressId, CauseId, EventId, IndividualId, UserId};

use crate::domain::entity::{
    cause::Cause,
    event::{CreationLimit, Event, EventSummary, NewEvent},
    signup::{Attendee, Participant, SignUp},
};
use crate::domain::services::filter::EventFilters;
use crate::error::ActivityResult;

/// Which events a listing draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    All,
    /// Events linked to a cause the user selected
    SelectedCauses(UserId),
    FavouritedBy(IndividualId),
    SignedUpBy(IndividualId),
    AttendedBy(IndividualId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    /// Strictly after `now`
    Upcoming,
    Past,
    Any,
}

#[derive(Debug, Clone)]
pub struct EventSelection {
    pub scope: EventScope,
    pub timeframe: Timeframe,
    pub filters: EventFilters,
    pub now: DateTime<Utc>,
}

impl EventSelection {
    pub fn new(scope: EventScope, timeframe: Timeframe) -> Self {
        Self {
            scope,
            timeframe,
            filters: EventFilters::default(),
            now: Utc::now(),
        }
    }

    pub fn with_filters(mut self, filters: EventFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn in_timeframe(&self, date: DateTime<Utc>) -> bool {
        match self.timeframe {
            Timeframe::Upcoming => date > self.now,
            Timeframe::Past => date <= self.now,
            Timeframe::Any => true,
        }
    }
}

#[trait_variant::make(EventRepository: Send)]
pub trait LocalEventRepository {
    /// `None` when the user does not exist
    async fn find_participant(&self, user_id: UserId) -> ActivityResult<Option<Participant>>;

    async fn count_events_created_since(
        &self,
        user_id: UserId,
        since: DateTime<Utc>,
    ) -> ActivityResult<usize>;

    async fn insert_address(&self, address: &NewAddress) -> ActivityResult<Address>;

    async fn find_address(&self, address_id: AddressId) -> ActivityResult<Option<Address>>;

    async fn update_address(&self, address: &Address) -> ActivityResult<()>;

    /// Insert the event and link it to `causes`. With a `limit`, the creator's
    /// recent events are counted in the same transaction and
    /// `CreationLimitReached` is returned once the cap is hit.
    async fn insert_event(
        &self,
        event: &NewEvent,
        causes: &[CauseId],
        limit: Option<CreationLimit>,
    ) -> ActivityResult<Event>;

    async fn find_event(&self, event_id: EventId) -> ActivityResult<Option<Event>>;

    async fn update_event(&self, event: &Event) -> ActivityResult<()>;

    /// Remove the event with its cause links, signups and favourites
    async fn delete_event(&self, event_id: EventId) -> ActivityResult<()>;

    /// Events matching `selection`, ordered by date
    async fn list_events(&self, selection: &EventSelection) -> ActivityResult<Vec<EventSummary>>;

    async fn event_causes(&self, event_id: EventId) -> ActivityResult<Vec<Cause>>;

    async fn count_signups(&self, event_id: EventId) -> ActivityResult<usize>;
}

#[trait_variant::make(SignUpRepository: Send)]
pub trait LocalSignUpRepository {
    async fn insert_signup(&self, signup: &SignUp) -> ActivityResult<()>;

    async fn find_signup(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<Option<SignUp>>;

    async fn update_signup(&self, signup: &SignUp) -> ActivityResult<()>;

    /// `false` when there was no signup to delete
    async fn delete_signup(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<bool>;

    async fn list_attendees(&self, event_id: EventId) -> ActivityResult<Vec<Attendee>>;
}

#[trait_variant::make(FavouriteRepository: Send)]
pub trait LocalFavouriteRepository {
    /// Favouriting twice is not an error
    async fn insert_favourite(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<()>;

    /// `false` when there was nothing to delete
    async fn delete_favourite(
        &self,
        individual_id: IndividualId,
        event_id: EventId,
    ) -> ActivityResult<bool>;
}

#[trait_variant::make(CauseRepository: Send)]
pub trait LocalCauseRepository {
    async fn list_causes(&self) -> ActivityResult<Vec<Cause>>;

    async fn find_cause(&self, cause_id: CauseId) -> ActivityResult<Option<Cause>>;

    async fn selected_causes(&self, user_id: UserId) -> ActivityResult<Vec<Cause>>;

    /// Replace the user's selection in one transaction
    async fn replace_selected_causes(
        &self,
        user_id: UserId,
        causes: &[CauseId],
    ) -> ActivityResult<()>;
}

/// Everything the activity handlers need from storage
pub trait ActivityStore:
    EventRepository
    + SignUpRepository
    + FavouriteRepository
    + CauseRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> ActivityStore for T where
    T: EventRepository
        + SignUpRepository
        + FavouriteRepository
        + CauseRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
