//! Domain Services
//!
//! Password choice rules shared by registration, reset and change password.

use platform::password::{ClearTextPassword, PasswordPolicyError};

use crate::error::{AuthError, AuthResult};

/// Validate a newly chosen password and its confirmation.
///
/// Mismatch is reported before strength. With `enforce_strength` off only
/// the basic shape checks of [`ClearTextPassword::new`] apply.
pub fn choose_password(
    password: String,
    confirmation: &str,
    enforce_strength: bool,
) -> AuthResult<ClearTextPassword> {
    if password != confirmation {
        return Err(AuthError::PasswordsDoNotMatch);
    }

    let password = ClearTextPassword::new(password).map_err(|e: PasswordPolicyError| {
        AuthError::WeakPassword(vec![e.to_string()])
    })?;

    if enforce_strength {
        let report = password.strength();
        if !report.is_strong() {
            return Err(AuthError::WeakPassword(report.errors));
        }
    }

    Ok(password)
}
