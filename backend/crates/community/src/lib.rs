//! Community Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Profiles, settings, notifications, information entries and repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Individual and organisation registration with geocoded addresses
//! - Profile viewing (own or another user's) and partial profile edits
//! - Email and notification preference flags
//! - User-to-user notifications fanned out per receiver
//! - Public information entries (privacy policy, terms)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use error::{CommunityError, CommunityResult};
pub use infra::postgres::PgCommunityRepository;
pub use presentation::router::{community_router, information_router};
