//! User Entity
//!
//! Account created after the email is verified. Profile data (individual or
//! organisation) lives in the community crate and references `id`.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, username::Username};

#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub username: Username,
    pub password_hash: HashedPassword,
    pub date_registered: DateTime<Utc>,
}

/// User row before insertion; the database assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub password_hash: HashedPassword,
}

impl NewUser {
    pub fn into_user(self, id: UserId, date_registered: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            username: self.username,
            password_hash: self.password_hash,
            date_registered,
        }
    }
}
