//! Authenticated caller
//!
//! The auth middleware verifies the bearer token and stores a [`CurrentUser`]
//! in the request extensions. Handlers in any crate extract it from there.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::error::app_error::AppError;
use crate::id::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: UserId,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .copied()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}
