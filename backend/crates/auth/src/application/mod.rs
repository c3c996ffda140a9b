//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod change_password;
pub mod config;
pub mod grant;
pub mod password_reset;
pub mod register_user;
pub mod sign_in;
pub mod sign_in_email;
pub mod sign_out;
pub mod verify_email;

// Re-exports
pub use authenticate::{Authenticated, AuthenticateUseCase, bearer_token};
pub use change_password::{ChangePasswordInput, ChangePasswordUseCase};
pub use config::AuthConfig;
pub use grant::TokenGrant;
pub use password_reset::PasswordResetUseCase;
pub use register_user::{RegisterUserInput, RegisterUserUseCase};
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_in_email::SignInEmailUseCase;
pub use sign_out::SignOutUseCase;
pub use verify_email::VerifyEmailUseCase;
