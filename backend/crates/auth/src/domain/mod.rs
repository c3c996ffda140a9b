//! Domain Layer
//!
//! Contains entities, value objects, services and repository traits.

pub mod entity;
pub mod repository;
pub mod services;
pub mod value_object;

// Re-exports
pub use entity::{
    registration::{Registration, RegistrationStatus},
    reset::ResetToken,
    user::{NewUser, User},
};
pub use repository::{
    AuthStore, RegistrationRepository, ResetRepository, TokenBlacklistRepository, UserRepository,
};
