//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email-first sign up: record email, verify a mailed 6-digit code, create the user
//! - Password sign in issuing signed bearer tokens
//! - Sign out by revoking the token id until it would have expired
//! - Forgot password via a mailed code exchanged for a short-lived reset grant
//! - Change password for signed-in users
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optionally peppered
//! - Bearer tokens scoped by audience (`/user` or `/reset`)
//! - Verification and reset codes compared in constant time

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use application::Authenticated;
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::{AuthMiddlewareState, require_authentication};
pub use presentation::router::auth_router;
