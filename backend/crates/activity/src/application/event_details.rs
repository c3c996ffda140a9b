//! Single Event Use Cases
//!
//! Fetching one event with its address and causes, and deleting it.

use std::sync::Arc;

use kernel::id::{EventId, UserId};

use crate::domain::entity::event::{Event, EventDetails, spots_remaining};
use crate::domain::repository::EventRepository;
use crate::error::{ActivityError, ActivityResult};

pub struct EventDetailsUseCase<R>
where
    R: EventRepository,
{
    repo: Arc<R>,
}

impl<R> EventDetailsUseCase<R>
where
    R: EventRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, event_id: EventId) -> ActivityResult<EventDetails> {
        let event = self.find(event_id).await?;
        let address = self
            .repo
            .find_address(event.address_id)
            .await?
            .ok_or_else(|| {
                ActivityError::Internal(format!("Event {event_id} has no address row"))
            })?;
        let causes = self.repo.event_causes(event_id).await?;
        let taken = self.repo.count_signups(event_id).await?;

        Ok(EventDetails {
            spots_remaining: spots_remaining(event.spots, taken),
            event,
            address,
            causes,
        })
    }

    /// Delete an event the caller created. Returns the deleted event.
    pub async fn delete(&self, user_id: UserId, event_id: EventId) -> ActivityResult<Event> {
        let event = self.find(event_id).await?;
        if !event.is_created_by(user_id) {
            return Err(ActivityError::NotEventCreator);
        }

        self.repo.delete_event(event_id).await?;

        tracing::info!(event_id = %event_id, user_id = %user_id, "Event deleted");
        Ok(event)
    }

    async fn find(&self, event_id: EventId) -> ActivityResult<Event> {
        self.repo
            .find_event(event_id)
            .await?
            .ok_or(ActivityError::EventNotFound)
    }
}
