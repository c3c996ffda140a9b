//! In-memory doubles for the auth repositories and mailer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::mail::{MailError, MailMessage, Mailer};
use platform::password::HashedPassword;

use crate::domain::entity::{
    registration::Registration,
    reset::ResetToken,
    user::{NewUser, User},
};
use crate::domain::repository::{
    RegistrationRepository, ResetRepository, TokenBlacklistRepository, UserRepository,
};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct State {
    registrations: HashMap<String, Registration>,
    users: Vec<User>,
    profiles: Vec<UserId>,
    resets: Vec<ResetToken>,
    blacklist: HashMap<String, DateTime<Utc>>,
}

#[derive(Clone, Default)]
pub struct MemoryAuthStore {
    state: Arc<Mutex<State>>,
}

impl MemoryAuthStore {
    pub fn add_profile(&self, user_id: UserId) {
        self.state.lock().unwrap().profiles.push(user_id);
    }

    pub fn registration(&self, email: &str) -> Option<Registration> {
        self.state.lock().unwrap().registrations.get(email).cloned()
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.state
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email.as_str() == email)
            .cloned()
    }

    pub fn resets(&self) -> Vec<ResetToken> {
        self.state.lock().unwrap().resets.clone()
    }

    pub fn blacklist_len(&self) -> usize {
        self.state.lock().unwrap().blacklist.len()
    }
}

impl RegistrationRepository for MemoryAuthStore {
    async fn find_registration(&self, email: &Email) -> AuthResult<Option<Registration>> {
        Ok(self.registration(email.as_str()))
    }

    async fn save_registration(&self, registration: &Registration) -> AuthResult<()> {
        self.state
            .lock()
            .unwrap()
            .registrations
            .insert(registration.email.as_str().to_string(), registration.clone());
        Ok(())
    }
}

impl UserRepository for MemoryAuthStore {
    async fn insert_user(&self, user: &NewUser) -> AuthResult<User> {
        let mut state = self.state.lock().unwrap();
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::UserAlreadyRegistered);
        }
        let id = UserId::new(state.users.len() as i32 + 1);
        let created = user.clone().into_user(id, Utc::now());
        state.users.push(created.clone());
        Ok(created)
    }

    async fn find_user_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let state = self.state.lock().unwrap();
        Ok(state.users.iter().find(|u| u.id == user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self.user(email.as_str()))
    }

    async fn has_profile(&self, user_id: UserId) -> AuthResult<bool> {
        Ok(self.state.lock().unwrap().profiles.contains(&user_id))
    }

    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &HashedPassword,
    ) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.password_hash = password_hash.clone();
        }
        Ok(())
    }
}

impl ResetRepository for MemoryAuthStore {
    async fn insert_reset(&self, reset: &ResetToken) -> AuthResult<()> {
        self.state.lock().unwrap().resets.push(reset.clone());
        Ok(())
    }

    async fn latest_reset(&self, user_id: UserId) -> AuthResult<Option<ResetToken>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .resets
            .iter()
            .filter(|r| r.user_id == user_id)
            .max_by_key(|r| r.code.expires_at)
            .cloned())
    }
}

impl TokenBlacklistRepository for MemoryAuthStore {
    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> AuthResult<()> {
        self.state
            .lock()
            .unwrap()
            .blacklist
            .insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> AuthResult<bool> {
        Ok(self.state.lock().unwrap().blacklist.contains_key(jti))
    }

    async fn purge_expired_blacklist(&self) -> AuthResult<u64> {
        let now = Utc::now();
        let mut state = self.state.lock().unwrap();
        let before = state.blacklist.len();
        state.blacklist.retain(|_, expires_at| *expires_at > now);
        Ok((before - state.blacklist.len()) as u64)
    }
}

/// Keeps every message instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Last six digit code mailed to `to`
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .and_then(|m| {
                m.text
                    .split(|c: char| !c.is_ascii_digit())
                    .find(|part| part.len() == 6)
                    .map(str::to_string)
            })
    }
}

impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}
