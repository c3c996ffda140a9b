//! Signup Entities

use kernel::id::{EventId, IndividualId, UserId};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUp {
    pub individual_id: IndividualId,
    pub event_id: EventId,
    pub confirmed: bool,
    pub attended: bool,
}

/// Someone signed up to an event, with the profile fields organisers see.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub individual_id: IndividualId,
    pub user_id: UserId,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub confirmed: bool,
    pub attended: bool,
}

/// The user asking for events, as far as event listings care.
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub user_id: UserId,
    /// Present when the user registered as an individual
    pub individual_id: Option<IndividualId>,
    /// Coordinates of the profile address, when there is a profile
    pub location: Option<kernel::address::Coordinates>,
}
