//! Activity Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Events, signups, causes, repository traits and pure services
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Event listings with boolean, date and distance filters, sorted by date
//!   then distance from the caller's profile address
//! - Events grouped by the causes a user selected
//! - Event creation with geocoded addresses and a monthly limit for individuals
//! - Creator-only update and delete
//! - Signups, attendance and favourites for individuals
//! - Cause catalogue and per-user cause selection

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use application::config::ActivityConfig;
pub use error::{ActivityError, ActivityResult};
pub use infra::postgres::PgActivityRepository;
pub use presentation::router::{activity_router, causes_router};
