//! Signup and Favourite Use Cases

use std::sync::Arc;

use kernel::id::{EventId, UserId};

use crate::application::participant::require_individual;
use crate::domain::entity::signup::{Attendee, SignUp};
use crate::domain::repository::{EventRepository, FavouriteRepository, SignUpRepository};
use crate::error::{ActivityError, ActivityResult};

pub struct SignUpUseCase<R>
where
    R: EventRepository + SignUpRepository,
{
    repo: Arc<R>,
}

impl<R> SignUpUseCase<R>
where
    R: EventRepository + SignUpRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn sign_up(
        &self,
        user_id: UserId,
        event_id: EventId,
        confirmed: bool,
    ) -> ActivityResult<SignUp> {
        let individual_id = require_individual(self.repo.as_ref(), user_id).await?;
        require_event(self.repo.as_ref(), event_id).await?;

        if self
            .repo
            .find_signup(individual_id, event_id)
            .await?
            .is_some()
        {
            return Err(ActivityError::AlreadySignedUp);
        }

        let signup = SignUp {
            individual_id,
            event_id,
            confirmed,
            attended: false,
        };
        self.repo.insert_signup(&signup).await?;

        tracing::info!(event_id = %event_id, individual_id = %individual_id, "Signed up to event");
        Ok(signup)
    }

    pub async fn attendees(&self, event_id: EventId) -> ActivityResult<Vec<Attendee>> {
        require_event(self.repo.as_ref(), event_id).await?;
        self.repo.list_attendees(event_id).await
    }

    pub async fn update(
        &self,
        user_id: UserId,
        event_id: EventId,
        confirmed: bool,
        attended: bool,
    ) -> ActivityResult<SignUp> {
        let individual_id = require_individual(self.repo.as_ref(), user_id).await?;
        let mut signup = self
            .repo
            .find_signup(individual_id, event_id)
            .await?
            .ok_or(ActivityError::SignUpNotFound)?;

        signup.confirmed = confirmed;
        signup.attended = attended;
        self.repo.update_signup(&signup).await?;
        Ok(signup)
    }

    /// Withdraw the caller's signup
    pub async fn cancel(&self, user_id: UserId, event_id: EventId) -> ActivityResult<()> {
        let individual_id = require_individual(self.repo.as_ref(), user_id).await?;
        if !self.repo.delete_signup(individual_id, event_id).await? {
            return Err(ActivityError::SignUpNotFound);
        }

        tracing::info!(event_id = %event_id, individual_id = %individual_id, "Signup cancelled");
        Ok(())
    }
}

pub struct FavouriteUseCase<R>
where
    R: EventRepository + FavouriteRepository,
{
    repo: Arc<R>,
}

impl<R> FavouriteUseCase<R>
where
    R: EventRepository + FavouriteRepository + Sync,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn add(&self, user_id: UserId, event_id: EventId) -> ActivityResult<()> {
        let individual_id = require_individual(self.repo.as_ref(), user_id).await?;
        require_event(self.repo.as_ref(), event_id).await?;
        self.repo.insert_favourite(individual_id, event_id).await
    }

    pub async fn remove(&self, user_id: UserId, event_id: EventId) -> ActivityResult<()> {
        let individual_id = require_individual(self.repo.as_ref(), user_id).await?;
        if !self.repo.delete_favourite(individual_id, event_id).await? {
            return Err(ActivityError::FavouriteNotFound);
        }
        Ok(())
    }
}

async fn require_event<R>(repo: &R, event_id: EventId) -> ActivityResult<()>
where
    R: EventRepository + Sync,
{
    repo.find_event(event_id)
        .await?
        .map(|_| ())
        .ok_or(ActivityError::EventNotFound)
}
