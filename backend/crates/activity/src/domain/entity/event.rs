//! Event Entities

use chrono::{DateTime, Utc};
use kernel::address::Address;
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{AddressId, CauseId, EventId, IndividualId, UserId};
use serde::Serialize;

use super::cause::Cause;
use super::signup::Participant;
use crate::domain::services::distance::haversine_miles;

/// Fields an event creator chooses.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub name: String,
    pub women_only: bool,
    pub spots: i32,
    pub address_visible: bool,
    pub minimum_age: i32,
    pub photo_id: bool,
    pub physical: bool,
    pub add_info: bool,
    pub content: String,
    pub date: DateTime<Utc>,
}

impl EventDraft {
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push("name is required");
        }
        if self.spots < 0 {
            errors.push("spots must have a minimum value of 0");
        }
        if self.minimum_age < 0 {
            errors.push("minimumAge must have a minimum value of 0");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::bad_request("Input validation failed").with_errors(errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub address_id: AddressId,
    pub women_only: bool,
    pub spots: i32,
    pub address_visible: bool,
    pub minimum_age: i32,
    pub photo_id: bool,
    pub physical: bool,
    pub add_info: bool,
    pub content: String,
    pub date: DateTime<Utc>,
    /// Creator
    pub user_id: UserId,
    pub creation_date: DateTime<Utc>,
}

impl Event {
    pub fn is_created_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Replace the creator-editable fields.
    pub fn apply(&mut self, draft: EventDraft, address_id: AddressId) {
        self.name = draft.name;
        self.address_id = address_id;
        self.women_only = draft.women_only;
        self.spots = draft.spots;
        self.address_visible = draft.address_visible;
        self.minimum_age = draft.minimum_age;
        self.photo_id = draft.photo_id;
        self.physical = draft.physical;
        self.add_info = draft.add_info;
        self.content = draft.content;
        self.date = draft.date;
    }
}

/// Event that has not been inserted yet.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub draft: EventDraft,
    pub address_id: AddressId,
    pub user_id: UserId,
    pub creation_date: DateTime<Utc>,
}

/// At most `max` events created by the same user after `since`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreationLimit {
    pub max: usize,
    pub since: DateTime<Utc>,
}

impl NewEvent {
    pub fn into_event(self, id: EventId) -> Event {
        let d = self.draft;
        Event {
            id,
            name: d.name,
            address_id: self.address_id,
            women_only: d.women_only,
            spots: d.spots,
            address_visible: d.address_visible,
            minimum_age: d.minimum_age,
            photo_id: d.photo_id,
            physical: d.physical,
            add_info: d.add_info,
            content: d.content,
            date: d.date,
            user_id: self.user_id,
            creation_date: self.creation_date,
        }
    }
}

/// Event joined with everything a listing needs, independent of who asks.
#[derive(Debug, Clone)]
pub struct EventSummary {
    pub event: Event,
    pub address: Address,
    pub volunteers: Vec<IndividualId>,
    pub favourited_by: Vec<IndividualId>,
    pub causes: Vec<CauseId>,
}

/// One event in a listing, as seen by one participant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListing {
    #[serde(flatten)]
    pub event: Event,
    pub address: Address,
    pub volunteers: Vec<IndividualId>,
    pub causes: Vec<CauseId>,
    pub going: bool,
    pub favourited: bool,
    pub spots_remaining: i32,
    /// Miles from the participant's address; absent without a profile address
    pub distance: Option<f64>,
}

impl EventListing {
    pub fn for_participant(summary: EventSummary, participant: &Participant) -> Self {
        let (going, favourited) = match participant.individual_id {
            Some(id) => (
                summary.volunteers.contains(&id),
                summary.favourited_by.contains(&id),
            ),
            None => (false, false),
        };
        let distance = participant
            .location
            .map(|origin| haversine_miles(origin, summary.address.coordinates()));
        let spots_remaining = spots_remaining(summary.event.spots, summary.volunteers.len());

        Self {
            event: summary.event,
            address: summary.address,
            volunteers: summary.volunteers,
            causes: summary.causes,
            going,
            favourited,
            spots_remaining,
            distance,
        }
    }
}

/// Single event with its address and causes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(flatten)]
    pub event: Event,
    pub spots_remaining: i32,
    pub address: Address,
    pub causes: Vec<Cause>,
}

pub fn spots_remaining(spots: i32, taken: usize) -> i32 {
    spots.saturating_sub(i32::try_from(taken).unwrap_or(i32::MAX))
}
