//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use activity::{ActivityConfig, PgActivityRepository, activity_router, causes_router};
use auth::{AuthMiddlewareState, PgAuthRepository, auth_router, require_authentication};
use axum::{
    Router,
    http::{Method, header},
    middleware::from_fn_with_state,
};
use community::{PgCommunityRepository, community_router, information_router};
use platform::geocode::AnyGeocoder;
use platform::mail::AnyMailer;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,activity=info,community=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let server = ServerConfig::from_env()?;
    let auth_config = config::auth_config()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(server.database_max_connections)
        .connect(&server.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: drop blacklisted tokens that have expired anyway
    // Errors here should not prevent server startup
    let auth_repo = PgAuthRepository::new(pool.clone());
    match auth_repo.cleanup_expired().await {
        Ok(tokens) => {
            tracing::info!(tokens_deleted = tokens, "Token blacklist cleanup completed");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Token blacklist cleanup failed, continuing anyway"
            );
        }
    }

    // Outgoing services
    let mailer = AnyMailer::from_config(&config::mail_config())?;
    let geocoder = AnyGeocoder::from_config(&config::geocoder_config())?;

    // Signed-in routes share one auth layer
    let require_user = from_fn_with_state(
        AuthMiddlewareState::user(Arc::new(auth_repo.clone()), Arc::new(auth_config.clone())),
        require_authentication::<PgAuthRepository>,
    );

    let activity_repo = PgActivityRepository::new(pool.clone());
    let community_repo = PgCommunityRepository::new(pool.clone());

    let signed_in = Router::new()
        .merge(activity_router(
            activity_repo.clone(),
            geocoder.clone(),
            ActivityConfig::default(),
        ))
        .merge(community_router(community_repo.clone(), geocoder))
        .route_layer(require_user);

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(server.frontend_origins.clone())
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .merge(auth_router(auth_repo, mailer, auth_config))
        .merge(causes_router(activity_repo))
        .merge(information_router(community_repo))
        .merge(signed_in)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], server.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
