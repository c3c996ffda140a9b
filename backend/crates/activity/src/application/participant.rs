//! Caller lookups shared by the use cases

use kernel::id::{IndividualId, UserId};

use crate::domain::entity::signup::Participant;
use crate::domain::repository::EventRepository;
use crate::error::{ActivityError, ActivityResult};

pub(crate) async fn require_participant<R>(repo: &R, user_id: UserId) -> ActivityResult<Participant>
where
    R: EventRepository + Sync,
{
    repo.find_participant(user_id)
        .await?
        .ok_or(ActivityError::UserNotFound)
}

/// Signups and favourites belong to individuals, not organisations.
pub(crate) async fn require_individual<R>(repo: &R, user_id: UserId) -> ActivityResult<IndividualId>
where
    R: EventRepository + Sync,
{
    require_participant(repo, user_id)
        .await?
        .individual_id
        .ok_or(ActivityError::NotIndividual)
}
