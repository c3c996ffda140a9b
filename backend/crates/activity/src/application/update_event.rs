//! Update Event Use Case

use std::sync::Arc;

use kernel::address::NewAddress;
use kernel::id::{AddressId, EventId, UserId};
use platform::geocode::Geocoder;

use crate::application::create_event::geocoded;
use crate::domain::entity::event::{Event, EventDraft};
use crate::domain::repository::EventRepository;
use crate::error::{ActivityError, ActivityResult};

pub struct UpdateEventInput {
    pub draft: EventDraft,
    /// Must be the id of the event's current address
    pub address_id: Option<AddressId>,
    pub address: NewAddress,
}

pub struct UpdateEventUseCase<R, G>
where
    R: EventRepository,
    G: Geocoder,
{
    repo: Arc<R>,
    geocoder: Arc<G>,
}

impl<R, G> UpdateEventUseCase<R, G>
where
    R: EventRepository + Sync,
    G: Geocoder + Sync,
{
    pub fn new(repo: Arc<R>, geocoder: Arc<G>) -> Self {
        Self { repo, geocoder }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        event_id: EventId,
        input: UpdateEventInput,
    ) -> ActivityResult<Event> {
        input.draft.validate()?;
        input.address.validate()?;
        let address_id = input.address_id.ok_or(ActivityError::AddressIdMissing)?;

        let mut event = self
            .repo
            .find_event(event_id)
            .await?
            .ok_or(ActivityError::EventNotFound)?;
        if !event.is_created_by(user_id) {
            return Err(ActivityError::NotEventCreator);
        }
        if event.address_id != address_id {
            return Err(ActivityError::AddressMismatch);
        }

        let stored = self
            .repo
            .find_address(address_id)
            .await?
            .ok_or(ActivityError::AddressNotFound)?;
        // Only a moved address is geocoded again
        let address = if input.address.same_place_as(&stored) {
            input.address.with_coordinates(stored.coordinates())
        } else {
            geocoded(self.geocoder.as_ref(), input.address).await
        };
        self.repo
            .update_address(&address.into_address(address_id))
            .await?;

        event.apply(input.draft, address_id);
        self.repo.update_event(&event).await?;

        tracing::info!(event_id = %event.id, user_id = %user_id, "Event updated");
        Ok(event)
    }
}
