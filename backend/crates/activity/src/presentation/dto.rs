//! API DTOs (Data Transfer Objects)
//!
//! Event and signup requests are flat camelCase objects. Cause selection
//! nests under `data` like the sign-in forms.

use chrono::{DateTime, Utc};
use kernel::address::NewAddress;
use kernel::id::{AddressId, CauseId};
use kernel::pagination::{PageMeta, PageRequest};
use serde::{Deserialize, Serialize};

use crate::application::{CreateEventInput, UpdateEventInput};
use crate::domain::entity::event::{Event, EventDraft, EventListing};
use crate::domain::entity::signup::{Attendee, SignUp};
use crate::domain::services::filter::EventFilters;
use crate::error::ActivityResult;

// ============================================================================
// Listing queries
// ============================================================================

/// `GET /event` and `GET /event/causes` query string.
///
/// `filter[]` repeats, so this is read with `axum_extra::extract::Query`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListQuery {
    #[serde(rename = "filter[]", default)]
    pub filter: Vec<String>,
    pub availability_start: Option<String>,
    pub availability_end: Option<String>,
    pub max_distance: Option<f64>,
    pub page_size: Option<usize>,
    pub current_page: Option<usize>,
}

impl EventListQuery {
    pub fn filters(&self) -> ActivityResult<EventFilters> {
        EventFilters::parse(
            &self.filter,
            self.availability_start.as_deref(),
            self.availability_end.as_deref(),
            self.max_distance,
        )
    }

    pub fn page(&self) -> PageRequest {
        PageRequest {
            page_size: self.page_size,
            current_page: self.current_page,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventPageResponse {
    pub meta: PageMeta,
    pub events: Vec<EventListing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventsResponse {
    pub events: Vec<EventListing>,
}

// ============================================================================
// Create / update
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub name: String,
    #[serde(default)]
    pub women_only: bool,
    pub spots: i32,
    #[serde(default)]
    pub address_visible: bool,
    #[serde(default)]
    pub minimum_age: i32,
    #[serde(default)]
    pub photo_id: bool,
    #[serde(default)]
    pub physical: bool,
    #[serde(default)]
    pub add_info: bool,
    #[serde(default)]
    pub content: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub causes: Vec<CauseId>,
    #[serde(default)]
    pub address: Option<AddressRequest>,
    #[serde(default)]
    pub address_id: Option<AddressId>,
}

/// Address in an event body. On update it carries its own `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressRequest {
    #[serde(default)]
    pub id: Option<AddressId>,
    #[serde(flatten)]
    pub address: NewAddress,
}

impl EventRequest {
    fn draft(&self) -> EventDraft {
        EventDraft {
            name: self.name.clone(),
            women_only: self.women_only,
            spots: self.spots,
            address_visible: self.address_visible,
            minimum_age: self.minimum_age,
            photo_id: self.photo_id,
            physical: self.physical,
            add_info: self.add_info,
            content: self.content.clone(),
            date: self.date,
        }
    }

    pub fn into_create_input(self) -> CreateEventInput {
        CreateEventInput {
            draft: self.draft(),
            address_id: self
                .address_id
                .or_else(|| self.address.as_ref().and_then(|a| a.id)),
            address: self.address.map(|a| a.address),
            causes: self.causes,
        }
    }

    /// `None` when the body has no address at all.
    pub fn into_update_input(self) -> Option<UpdateEventInput> {
        let draft = self.draft();
        let address = self.address?;
        Some(UpdateEventInput {
            draft,
            address_id: address.id.or(self.address_id),
            address: address.address,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventResponse {
    pub event: Event,
}

// ============================================================================
// Signups
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpUpdateRequest {
    pub confirmed: bool,
    pub attended: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignUpResponse {
    pub signup: SignUp,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttendeesResponse {
    pub users: Vec<Attendee>,
}

// ============================================================================
// Causes
// ============================================================================

/// `{data: {causes: [{id}, ...]}}`
#[derive(Debug, Clone, Deserialize)]
pub struct SelectCausesData {
    #[serde(default)]
    pub causes: Vec<CauseRef>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CauseRef {
    pub id: CauseId,
}

impl SelectCausesData {
    pub fn ids(&self) -> Vec<CauseId> {
        self.causes.iter().map(|c| c.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event_body() -> serde_json::Value {
        json!({
            "name": "Beach clean",
            "womenOnly": true,
            "spots": 3,
            "addressVisible": true,
            "minimumAge": 16,
            "photoId": false,
            "physical": true,
            "addInfo": false,
            "content": "Bring gloves",
            "date": "2030-03-25T12:00:00Z",
            "causes": [1, 3],
            "address": {
                "id": 4,
                "address1": "Strand",
                "postcode": "WC2R 2LS",
                "city": "London",
                "lat": 51.51,
                "long": -0.11
            }
        })
    }

    #[test]
    fn test_event_request_into_inputs() {
        let request: EventRequest = serde_json::from_value(event_body()).unwrap();
        let create = request.clone().into_create_input();
        assert_eq!(create.draft.minimum_age, 16);
        assert_eq!(create.causes, [CauseId::new(1), CauseId::new(3)]);
        assert_eq!(create.address_id, Some(AddressId::new(4)));

        let update = request.into_update_input().unwrap();
        assert_eq!(update.address_id, Some(AddressId::new(4)));
        assert_eq!(update.address.city, "London");
    }

    #[test]
    fn test_update_without_address() {
        let mut body = event_body();
        body.as_object_mut().unwrap().remove("address");
        let request: EventRequest = serde_json::from_value(body).unwrap();
        assert!(request.into_update_input().is_none());
    }

    #[test]
    fn test_select_causes_data() {
        let data: SelectCausesData =
            serde_json::from_value(json!({"causes": [{"id": 2}, {"id": 5}]})).unwrap();
        assert_eq!(data.ids(), [CauseId::new(2), CauseId::new(5)]);
    }
}
