//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Messages are the exact strings the
//! mobile client switches on.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::mail::MailError;
use platform::password::PasswordHashError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Already authenticated.")]
    AlreadyAuthenticated,

    #[error("No email was specified")]
    EmailMissing,

    #[error("No user with specified email")]
    UserNotFound,

    #[error("Email not verified.")]
    EmailNotVerified,

    #[error("Email already verified.")]
    EmailAlreadyVerified,

    #[error("User account already registered.")]
    UserAlreadyRegistered,

    #[error("Invalid password.")]
    InvalidPassword,

    #[error("Incorrect old password.")]
    IncorrectOldPassword,

    #[error("Passwords do not match.")]
    PasswordsDoNotMatch,

    /// Carries the failed strength tests
    #[error("Weak password.")]
    WeakPassword(Vec<String>),

    // One-time codes (email verification and password reset)
    #[error("Token not defined")]
    CodeMissing,

    #[error("No token sent to {0}")]
    NoCodeSent(String),

    #[error("Token expired")]
    CodeExpired,

    #[error("Tokens did not match")]
    CodeMismatch,

    // Bearer tokens
    #[error("No authToken specified in incoming request.")]
    MissingAuthToken,

    #[error("Invalid authToken.")]
    InvalidAuthToken,

    #[error("authToken has expired.")]
    ExpiredAuthToken,

    #[error("authToken has been revoked.")]
    RevokedAuthToken,

    /// Input rejected by a value object
    #[error("{0}")]
    Validation(AppError),

    #[error("Could not send email: {0}")]
    Mail(#[from] MailError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::AlreadyAuthenticated
            | AuthError::EmailMissing
            | AuthError::EmailNotVerified
            | AuthError::EmailAlreadyVerified
            | AuthError::UserAlreadyRegistered
            | AuthError::InvalidPassword
            | AuthError::IncorrectOldPassword
            | AuthError::PasswordsDoNotMatch
            | AuthError::WeakPassword(_)
            | AuthError::CodeMissing
            | AuthError::CodeExpired
            | AuthError::CodeMismatch
            | AuthError::MissingAuthToken => ErrorKind::BadRequest,
            AuthError::UserNotFound | AuthError::NoCodeSent(_) => ErrorKind::NotFound,
            AuthError::InvalidAuthToken
            | AuthError::ExpiredAuthToken
            | AuthError::RevokedAuthToken => ErrorKind::Unauthorized,
            AuthError::Validation(e) => e.kind(),
            AuthError::Mail(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError, keeping the strength test failures as `errors`
    pub fn into_app_error(self) -> AppError {
        match self {
            AuthError::Validation(e) => e,
            AuthError::Database(e) => AppError::from(e),
            AuthError::WeakPassword(errors) => {
                AppError::bad_request("Weak password.").with_errors(errors)
            }
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Mail(e) => {
                tracing::error!(error = %e, "Auth mail delivery failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidPassword | AuthError::IncorrectOldPassword => {
                tracing::warn!("Password check failed");
            }
            AuthError::CodeMismatch => {
                tracing::warn!("One-time code mismatch");
            }
            AuthError::InvalidAuthToken | AuthError::RevokedAuthToken => {
                tracing::warn!(error = %self, "Rejected bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Validation(err)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::ExpiredAuthToken,
            TokenError::Invalid(_) => AuthError::InvalidAuthToken,
            TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::MissingAuthToken.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::RevokedAuthToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AuthError::NoCodeSent("a@b.com".into()).to_string(),
            "No token sent to a@b.com"
        );
        assert_eq!(AuthError::CodeMismatch.to_string(), "Tokens did not match");
    }

    #[test]
    fn test_weak_password_keeps_errors() {
        let app = AuthError::WeakPassword(vec!["too short".into()]).into_app_error();
        assert_eq!(app.message(), "Weak password.");
        assert_eq!(app.errors(), ["too short".to_string()]);
    }

    #[test]
    fn test_token_errors() {
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::ExpiredAuthToken
        ));
        assert!(matches!(
            AuthError::from(TokenError::Invalid("sig".into())),
            AuthError::InvalidAuthToken
        ));
    }
}
