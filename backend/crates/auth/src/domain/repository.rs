//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Method names are unique across traits because the Postgres repository
//! implements all of them on one type.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::entity::{
    registration::Registration,
    reset::ResetToken,
    user::{NewUser, User},
};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

#[trait_variant::make(RegistrationRepository: Send)]
pub trait LocalRegistrationRepository {
    async fn find_registration(&self, email: &Email) -> AuthResult<Option<Registration>>;

    /// Insert or replace the registration for `registration.email`
    async fn save_registration(&self, registration: &Registration) -> AuthResult<()>;
}

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create the user together with its default settings row
    async fn insert_user(&self, user: &NewUser) -> AuthResult<User>;

    async fn find_user_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Whether the user has an individual or organisation profile
    async fn has_profile(&self, user_id: UserId) -> AuthResult<bool>;

    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &HashedPassword,
    ) -> AuthResult<()>;
}

#[trait_variant::make(ResetRepository: Send)]
pub trait LocalResetRepository {
    async fn insert_reset(&self, reset: &ResetToken) -> AuthResult<()>;

    /// The reset code with the latest expiry for this user
    async fn latest_reset(&self, user_id: UserId) -> AuthResult<Option<ResetToken>>;
}

#[trait_variant::make(TokenBlacklistRepository: Send)]
pub trait LocalTokenBlacklistRepository {
    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> AuthResult<()>;

    async fn is_blacklisted(&self, jti: &str) -> AuthResult<bool>;

    /// Drop entries whose token has expired anyway
    async fn purge_expired_blacklist(&self) -> AuthResult<u64>;
}

/// Everything the auth handlers need from storage.
pub trait AuthStore:
    RegistrationRepository
    + UserRepository
    + ResetRepository
    + TokenBlacklistRepository
    + Clone
    + Send
    + Sync
    + 'static
{
}

impl<T> AuthStore for T where
    T: RegistrationRepository
        + UserRepository
        + ResetRepository
        + TokenBlacklistRepository
        + Clone
        + Send
        + Sync
        + 'static
{
}
