//! API DTOs (Data Transfer Objects)
//!
//! Sign-in style requests nest their fields under `data`
//! (see [`kernel::response::DataBody`]); password forms are flat.

use kernel::id::UserId;
use serde::{Deserialize, Serialize};

use crate::application::TokenGrant;

// ============================================================================
// Sign In / Sign Up
// ============================================================================

/// `{data: {email}}` for sign-in email, resend and forgot password
#[derive(Debug, Clone, Deserialize)]
pub struct EmailData {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyCodeData {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserData {
    pub user: RegisterUserBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserBody {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password_confirmation: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInData {
    pub email: String,
    pub password: String,
}

/// `{userId, authToken}`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrantResponse {
    pub user_id: UserId,
    pub auth_token: String,
}

impl From<TokenGrant> for TokenGrantResponse {
    fn from(grant: TokenGrant) -> Self {
        Self {
            user_id: grant.user_id,
            auth_token: grant.auth_token,
        }
    }
}

// ============================================================================
// Passwords
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}
