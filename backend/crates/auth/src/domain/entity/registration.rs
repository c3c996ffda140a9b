//! Registration Entity
//!
//! First step of sign-up: an email address plus the code sent to it.
//! A registration row always precedes the user row for the same email.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{email::Email, one_time_code::OneTimeCode};

#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    /// Set once the emailed code has been confirmed
    pub email_flag: bool,
    pub verification: OneTimeCode,
}

impl Registration {
    pub fn new(email: Email, verification: OneTimeCode) -> Self {
        Self {
            email,
            email_flag: false,
            verification,
        }
    }

    pub fn mark_verified(&mut self) {
        self.email_flag = true;
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.verification.expires_at
    }
}

/// Where an email address is in the sign-up flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// Just recorded; a verification code has been sent
    EmailRecorded,
    EmailUnverified,
    NoUserAccount,
    NoProfile,
    FullyRegistered,
}

impl RegistrationStatus {
    /// Derive the status from what exists for an email.
    pub fn from_records(registration: Option<&Registration>, has_user: bool, has_profile: bool) -> Self {
        match registration {
            None => Self::EmailRecorded,
            Some(r) if !r.email_flag => Self::EmailUnverified,
            Some(_) if !has_user => Self::NoUserAccount,
            Some(_) if !has_profile => Self::NoProfile,
            Some(_) => Self::FullyRegistered,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::FullyRegistered)
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::EmailRecorded => {
                "Email did not exist. Email successfully recorded, go to email verification screen."
            }
            Self::EmailUnverified => "Email exists but unverified. Goto email verification screen.",
            Self::NoUserAccount => "Email verified, but no user account. Goto user registration screen.",
            Self::NoProfile => {
                "User account registered, but no indiv/org profile. Aks for password and then goto indiv/org selection screen."
            }
            Self::FullyRegistered => "Fully registered. Goto login screen.",
        }
    }
}
