//! Community Error Types
//!
//! Profile, settings, notification and information errors. They convert
//! into `kernel::error::AppError` for rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type CommunityResult<T> = Result<T, CommunityError>;

#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("No user with given id")]
    UserNotFound,

    #[error("ID is not a number.")]
    InvalidUserId,

    // Profiles
    #[error("User already has an individual or organisation profile.")]
    AlreadyRegistered,

    #[error("User has no individual or organisation profile.")]
    NoProfile,

    #[error("Only women can filter by women only events.")]
    WomenOnlyRestricted,

    #[error("Username already taken.")]
    UsernameTaken,

    // Settings
    #[error("Settings flags must be 0 or 1")]
    InvalidSettings,

    // Notifications
    #[error("Notification is not in right format")]
    InvalidNotification(Vec<String>),

    #[error("No user with id {0}")]
    ReceiverNotFound(i32),

    // Information
    #[error("Information type not specified")]
    InformationTypeMissing,

    #[error("No information entry with given type")]
    InformationNotFound,

    /// Input rejected by validation
    #[error("{0}")]
    Validation(AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommunityError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CommunityError::InvalidUserId
            | CommunityError::AlreadyRegistered
            | CommunityError::NoProfile
            | CommunityError::WomenOnlyRestricted
            | CommunityError::InvalidSettings
            | CommunityError::InvalidNotification(_)
            | CommunityError::InformationTypeMissing => ErrorKind::BadRequest,
            CommunityError::UserNotFound
            | CommunityError::ReceiverNotFound(_)
            | CommunityError::InformationNotFound => ErrorKind::NotFound,
            CommunityError::UsernameTaken => ErrorKind::Conflict,
            CommunityError::Validation(e) => e.kind(),
            CommunityError::Database(_) | CommunityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn into_app_error(self) -> AppError {
        match self {
            CommunityError::Validation(e) => e,
            CommunityError::Database(e) => AppError::from(e),
            CommunityError::InvalidNotification(errors) => {
                AppError::bad_request("Notification is not in right format").with_errors(errors)
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            CommunityError::Database(e) => {
                tracing::error!(error = %e, "Community database error");
            }
            CommunityError::Internal(msg) => {
                tracing::error!(message = %msg, "Community internal error");
            }
            CommunityError::WomenOnlyRestricted => {
                tracing::warn!("Non-woman updating women-only filter");
            }
            _ => {
                tracing::debug!(error = %self, "Community error");
            }
        }
    }
}

impl IntoResponse for CommunityError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for CommunityError {
    fn from(err: AppError) -> Self {
        CommunityError::Validation(err)
    }
}
