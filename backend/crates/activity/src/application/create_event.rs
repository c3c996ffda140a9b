//! Create Event Use Case

use std::sync::Arc;

use chrono::Utc;
use kernel::address::{Coordinates, NewAddress};
use kernel::id::{AddressId, CauseId, UserId};
use platform::geocode::{Geocoder, locate_or_origin};
use serde::Serialize;

use crate::application::config::ActivityConfig;
use crate::application::participant::require_participant;
use crate::domain::entity::cause::Cause;
use crate::domain::entity::event::{CreationLimit, Event, EventDraft, NewEvent};
use crate::domain::repository::{CauseRepository, EventRepository};
use crate::error::{ActivityError, ActivityResult};

pub struct CreateEventInput {
    pub draft: EventDraft,
    /// New address to insert, unless `address_id` points at an existing one
    pub address: Option<NewAddress>,
    pub address_id: Option<AddressId>,
    pub causes: Vec<CauseId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedEvent {
    pub event: Event,
    pub causes: Vec<Cause>,
}

pub struct CreateEventUseCase<R, G>
where
    R: EventRepository + CauseRepository,
    G: Geocoder,
{
    repo: Arc<R>,
    geocoder: Arc<G>,
    config: Arc<ActivityConfig>,
}

impl<R, G> CreateEventUseCase<R, G>
where
    R: EventRepository + CauseRepository + Sync,
    G: Geocoder + Sync,
{
    pub fn new(repo: Arc<R>, geocoder: Arc<G>, config: Arc<ActivityConfig>) -> Self {
        Self {
            repo,
            geocoder,
            config,
        }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        input: CreateEventInput,
    ) -> ActivityResult<CreatedEvent> {
        input.draft.validate()?;
        let participant = require_participant(self.repo.as_ref(), user_id).await?;

        // Organisations are not limited. The repository checks again while
        // inserting; this early check skips geocoding for rejected requests.
        let limit = participant.individual_id.map(|_| CreationLimit {
            max: self.config.monthly_event_limit,
            since: Utc::now() - self.config.creation_window(),
        });
        if let Some(limit) = limit {
            let created = self
                .repo
                .count_events_created_since(user_id, limit.since)
                .await?;
            if created >= limit.max {
                return Err(ActivityError::CreationLimitReached(limit.max));
            }
        }

        let causes = self.resolve_causes(&input.causes).await?;

        let address_id = match (input.address_id, input.address) {
            (Some(address_id), _) => {
                self.repo
                    .find_address(address_id)
                    .await?
                    .ok_or(ActivityError::AddressNotFound)?
                    .id
            }
            (None, Some(address)) => {
                address.validate()?;
                let address = geocoded(self.geocoder.as_ref(), address).await;
                self.repo.insert_address(&address).await?.id
            }
            (None, None) => return Err(ActivityError::AddressMissing),
        };

        let new_event = NewEvent {
            draft: input.draft,
            address_id,
            user_id,
            creation_date: Utc::now(),
        };
        let cause_ids: Vec<CauseId> = causes.iter().map(|c| c.id).collect();
        let event = self
            .repo
            .insert_event(&new_event, &cause_ids, limit)
            .await?;

        tracing::info!(event_id = %event.id, user_id = %user_id, "Event created");
        Ok(CreatedEvent { event, causes })
    }

    /// Every id must name an existing cause. Repeated ids count once, in
    /// first-seen order.
    async fn resolve_causes(&self, ids: &[CauseId]) -> ActivityResult<Vec<Cause>> {
        let known = self.repo.list_causes().await?;
        let mut causes: Vec<Cause> = Vec::with_capacity(ids.len());
        for id in ids {
            let cause = known
                .iter()
                .find(|cause| cause.id == *id)
                .ok_or(ActivityError::UnknownCause(id.value()))?;
            if !causes.iter().any(|seen| seen.id == *id) {
                causes.push(cause.clone());
            }
        }
        Ok(causes)
    }
}

/// Fill in coordinates from the geocoder, `(0, 0)` when it finds nothing.
pub(crate) async fn geocoded<G: Geocoder + Sync>(geocoder: &G, address: NewAddress) -> NewAddress {
    let point = locate_or_origin(geocoder, &address.one_line()).await;
    address.with_coordinates(Coordinates {
        lat: point.lat,
        long: point.long,
    })
}
