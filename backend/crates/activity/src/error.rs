//! Activity Error Types
//!
//! Event, signup, favourite and cause errors. They convert into
//! `kernel::error::AppError` for rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type ActivityResult<T> = Result<T, ActivityError>;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("No user with given id")]
    UserNotFound,

    // Events
    #[error("No events found")]
    NoEventsFound,

    #[error("No events with causes selected by user and corresponding filters.")]
    NoEventsForSelectedCauses,

    #[error("No event with given id")]
    EventNotFound,

    #[error("Event ID specified is in wrong format")]
    InvalidEventId,

    #[error("Only the event creator can change this event.")]
    NotEventCreator,

    #[error("Event creation limit reached; user has already created {0} events this month.")]
    CreationLimitReached(usize),

    #[error("Either an address or an addressId must be specified")]
    AddressMissing,

    #[error("Address id must be specified when updating an event")]
    AddressIdMissing,

    #[error("No address with given id")]
    AddressNotFound,

    #[error("Address does not belong to this event")]
    AddressMismatch,

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    // Signups and favourites
    #[error("Only individuals can sign up to events.")]
    NotIndividual,

    #[error("Already signed up to this event.")]
    AlreadySignedUp,

    #[error("No signup for this event.")]
    SignUpNotFound,

    #[error("Event was not favourited.")]
    FavouriteNotFound,

    // Causes
    #[error("ID specified is in wrong format")]
    InvalidCauseId,

    #[error("No cause with given id")]
    CauseNotFound,

    #[error("No causes were specified in the body")]
    NoCausesSpecified,

    #[error("Unknown cause id {0}")]
    UnknownCause(i32),

    /// Input rejected by validation
    #[error("{0}")]
    Validation(AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActivityError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ActivityError::CreationLimitReached(_)
            | ActivityError::AddressMissing
            | ActivityError::AddressIdMissing
            | ActivityError::AddressMismatch
            | ActivityError::InvalidEventId
            | ActivityError::InvalidFilter(_)
            | ActivityError::NotIndividual
            | ActivityError::InvalidCauseId
            | ActivityError::NoCausesSpecified
            | ActivityError::UnknownCause(_) => ErrorKind::BadRequest,
            ActivityError::UserNotFound
            | ActivityError::NoEventsFound
            | ActivityError::NoEventsForSelectedCauses
            | ActivityError::EventNotFound
            | ActivityError::AddressNotFound
            | ActivityError::SignUpNotFound
            | ActivityError::FavouriteNotFound
            | ActivityError::CauseNotFound => ErrorKind::NotFound,
            ActivityError::NotEventCreator => ErrorKind::Forbidden,
            ActivityError::AlreadySignedUp => ErrorKind::Conflict,
            ActivityError::Validation(e) => e.kind(),
            ActivityError::Database(_) | ActivityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            ActivityError::Validation(e) => e,
            ActivityError::Database(e) => AppError::from(e),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            ActivityError::Database(e) => {
                tracing::error!(error = %e, "Activity database error");
            }
            ActivityError::Internal(msg) => {
                tracing::error!(message = %msg, "Activity internal error");
            }
            ActivityError::NotEventCreator => {
                tracing::warn!("Attempt to change an event owned by another user");
            }
            _ => {
                tracing::debug!(error = %self, "Activity error");
            }
        }
    }
}

impl IntoResponse for ActivityError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for ActivityError {
    fn from(err: AppError) -> Self {
        ActivityError::Validation(err)
    }
}
