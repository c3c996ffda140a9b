//! Browse Events Use Case
//!
//! The listing tabs of the mobile app: all events, events for the user's
//! causes, favourites, upcoming signups and attended history.

use std::collections::BTreeMap;
use std::sync::Arc;

use kernel::id::{IndividualId, UserId};
use kernel::pagination::{PageMeta, PageRequest, paginate};

use crate::application::participant::require_participant;
use crate::domain::entity::event::EventListing;
use crate::domain::entity::signup::Participant;
use crate::domain::repository::{
    CauseRepository, EventRepository, EventScope, EventSelection, Timeframe,
};
use crate::domain::services::filter::EventFilters;
use crate::domain::services::sorting::{
    filter_max_distance, group_by_cause, sort_by_time, sort_by_time_and_distance,
};
use crate::error::{ActivityError, ActivityResult};

pub struct BrowseEventsUseCase<R>
where
    R: EventRepository + CauseRepository,
{
    repo: Arc<R>,
}

impl<R> BrowseEventsUseCase<R>
where
    R: EventRepository + CauseRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// "All" tab: future events, nearest first within a day, one page.
    pub async fn all(
        &self,
        user_id: UserId,
        filters: EventFilters,
        page: &PageRequest,
    ) -> ActivityResult<(PageMeta, Vec<EventListing>)> {
        let participant = require_participant(self.repo.as_ref(), user_id).await?;
        let selection =
            EventSelection::new(EventScope::All, Timeframe::Upcoming).with_filters(filters);

        let events = self.filtered_listings(&selection, &participant).await?;
        if events.is_empty() {
            return Err(ActivityError::NoEventsFound);
        }

        tracing::debug!(user_id = %user_id, count = events.len(), "Listed events");
        Ok(paginate(events, page))
    }

    /// "Causes" tab: future events grouped by the user's selected cause names.
    pub async fn by_selected_causes(
        &self,
        user_id: UserId,
        filters: EventFilters,
    ) -> ActivityResult<BTreeMap<String, Vec<EventListing>>> {
        let participant = require_participant(self.repo.as_ref(), user_id).await?;
        let selection = EventSelection::new(EventScope::SelectedCauses(user_id), Timeframe::Upcoming)
            .with_filters(filters);

        let events = self.filtered_listings(&selection, &participant).await?;
        if events.is_empty() {
            return Err(ActivityError::NoEventsForSelectedCauses);
        }

        let causes = self.repo.selected_causes(user_id).await?;
        Ok(group_by_cause(events, &causes))
    }

    pub async fn favourites(&self, user_id: UserId) -> ActivityResult<Vec<EventListing>> {
        self.individual_listings(user_id, EventScope::FavouritedBy, Timeframe::Any)
            .await
    }

    /// Upcoming events the individual signed up to
    pub async fn going(&self, user_id: UserId) -> ActivityResult<Vec<EventListing>> {
        self.individual_listings(user_id, EventScope::SignedUpBy, Timeframe::Upcoming)
            .await
    }

    /// Past events the individual attended
    pub async fn history(&self, user_id: UserId) -> ActivityResult<Vec<EventListing>> {
        self.individual_listings(user_id, EventScope::AttendedBy, Timeframe::Past)
            .await
    }

    async fn filtered_listings(
        &self,
        selection: &EventSelection,
        participant: &Participant,
    ) -> ActivityResult<Vec<EventListing>> {
        let mut events = self.listings(selection, participant).await?;
        sort_by_time_and_distance(&mut events);
        if let Some(max_miles) = selection.filters.max_distance {
            events = filter_max_distance(events, max_miles);
        }
        Ok(events)
    }

    async fn individual_listings(
        &self,
        user_id: UserId,
        scope: impl FnOnce(IndividualId) -> EventScope,
        timeframe: Timeframe,
    ) -> ActivityResult<Vec<EventListing>> {
        let participant = require_participant(self.repo.as_ref(), user_id).await?;
        let individual_id = participant
            .individual_id
            .ok_or(ActivityError::NotIndividual)?;
        let selection = EventSelection::new(scope(individual_id), timeframe);

        let mut events = self.listings(&selection, &participant).await?;
        sort_by_time(&mut events);
        Ok(events)
    }

    async fn listings(
        &self,
        selection: &EventSelection,
        participant: &Participant,
    ) -> ActivityResult<Vec<EventListing>> {
        Ok(self
            .repo
            .list_events(selection)
            .await?
            .into_iter()
            .map(|summary| EventListing::for_participant(summary, participant))
            .collect())
    }
}
