//! Auth Router

use axum::{Router, middleware::from_fn_with_state, routing::post};
use platform::mail::{AnyMailer, Mailer};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::AuthStore;
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_authentication};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, mailer: AnyMailer, config: AuthConfig) -> Router {
    auth_router_generic(repo, mailer, config)
}

/// Create a generic Auth router for any repository and mailer
pub fn auth_router_generic<R, M>(repo: R, mailer: M, config: AuthConfig) -> Router
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let config = Arc::new(config);
    let state = AuthAppState {
        repo: repo.clone(),
        mailer: Arc::new(mailer),
        config: config.clone(),
    };

    let public = Router::new()
        .route("/signin/email", post(handlers::sign_in_email::<R, M>))
        .route(
            "/signin/email/resend",
            post(handlers::resend_verification::<R, M>),
        )
        .route("/verify/email", post(handlers::verify_email::<R, M>))
        .route("/signup/user", post(handlers::register_user::<R, M>))
        .route("/signin/password", post(handlers::sign_in::<R, M>))
        .route("/signin/forgot", post(handlers::forgot_password::<R, M>))
        .route(
            "/signin/forgot/confirm",
            post(handlers::confirm_reset_code::<R, M>),
        );

    let signed_in = Router::new()
        .route("/signout", post(handlers::sign_out::<R, M>))
        .route(
            "/profile/edit/password",
            post(handlers::change_password::<R, M>),
        )
        .route_layer(from_fn_with_state(
            AuthMiddlewareState::user(repo.clone(), config.clone()),
            require_authentication::<R>,
        ));

    let resetting = Router::new()
        .route(
            "/signin/forgot/password",
            post(handlers::reset_password::<R, M>),
        )
        .route_layer(from_fn_with_state(
            AuthMiddlewareState::reset(repo, config),
            require_authentication::<R>,
        ));

    public.merge(signed_in).merge(resetting).with_state(state)
}
