//! Auth Middleware
//!
//! Middleware for requiring a bearer token on protected routes. On success
//! the request carries [`CurrentUser`](kernel::caller::CurrentUser) and the
//! verified [`Authenticated`] claims in its extensions.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::Response;
use platform::token::{RESET_AUDIENCE, USER_AUDIENCE};
use std::sync::Arc;

use crate::application::AuthenticateUseCase;
use crate::application::config::AuthConfig;
use crate::domain::repository::TokenBlacklistRepository;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<R>
where
    R: TokenBlacklistRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    /// Token audience this layer accepts
    pub audience: &'static str,
}

impl<R> AuthMiddlewareState<R>
where
    R: TokenBlacklistRepository + Clone + Send + Sync + 'static,
{
    /// Accepts normal sign-in tokens
    pub fn user(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            config,
            audience: USER_AUDIENCE,
        }
    }

    /// Accepts only the password reset grant
    pub fn reset(repo: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            config,
            audience: RESET_AUDIENCE,
        }
    }
}

/// Middleware that requires a valid, not signed-out bearer token
pub async fn require_authentication<R>(
    State(state): State<AuthMiddlewareState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError>
where
    R: TokenBlacklistRepository + Clone + Send + Sync + 'static,
{
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let use_case = AuthenticateUseCase::new(state.repo.clone(), state.config.clone());
    let authenticated = use_case
        .execute(authorization.as_deref(), state.audience)
        .await?;

    tracing::debug!(user_id = %authenticated.user.user_id, "Request authenticated");

    req.extensions_mut().insert(authenticated.user);
    req.extensions_mut().insert(authenticated);

    Ok(next.run(req).await)
}
