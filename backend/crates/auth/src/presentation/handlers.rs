//! HTTP Handlers

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use kernel::response::{ApiResponse, DataBody};
use platform::mail::Mailer;
use platform::token::USER_AUDIENCE;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    Authenticated, AuthenticateUseCase, ChangePasswordInput, ChangePasswordUseCase,
    PasswordResetUseCase, RegisterUserInput, RegisterUserUseCase, SignInEmailUseCase,
    SignInInput, SignInUseCase, SignOutUseCase, VerifyEmailUseCase,
};
use crate::domain::repository::AuthStore;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    ChangePasswordRequest, EmailData, RegisterUserData, ResetPasswordRequest, SignInData,
    TokenGrantResponse, VerifyCodeData,
};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R, M>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub mailer: Arc<M>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign-up flow
// ============================================================================

/// POST /signin/email
pub async fn sign_in_email<R, M>(
    State(state): State<AuthAppState<R, M>>,
    headers: HeaderMap,
    Json(req): Json<DataBody<EmailData>>,
) -> AuthResult<Response>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if authorization.is_some() {
        let authenticate = AuthenticateUseCase::new(state.repo.clone(), state.config.clone());
        if authenticate.execute(authorization, USER_AUDIENCE).await.is_ok() {
            return Err(AuthError::AlreadyAuthenticated);
        }
    }

    let use_case =
        SignInEmailUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    let status = use_case
        .execute(req.data.email.as_deref().unwrap_or_default())
        .await?;

    let code = if status.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((code, Json(ApiResponse::message(status.message()))).into_response())
}

/// POST /signin/email/resend
pub async fn resend_verification<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<DataBody<EmailData>>,
) -> AuthResult<ApiResponse<()>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case =
        VerifyEmailUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    use_case
        .resend(req.data.email.as_deref().unwrap_or_default())
        .await?;

    Ok(ApiResponse::message("Verification email resent successfully."))
}

/// POST /verify/email
pub async fn verify_email<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<DataBody<VerifyCodeData>>,
) -> AuthResult<ApiResponse<()>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case =
        VerifyEmailUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    use_case
        .execute(&req.data.email, req.data.token.as_deref())
        .await?;

    Ok(ApiResponse::message(
        "Email successfully verified. Go to registration screen.",
    ))
}

/// POST /signup/user
pub async fn register_user<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<DataBody<RegisterUserData>>,
) -> AuthResult<ApiResponse<TokenGrantResponse>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let body = req.data.user;
    let use_case = RegisterUserUseCase::new(state.repo.clone(), state.config.clone());
    let grant = use_case
        .execute(RegisterUserInput {
            email: body.email,
            username: body.username,
            password: body.password,
            password_confirmation: body.password_confirmation,
        })
        .await?;

    Ok(ApiResponse::new(
        "User registration successful. Goto individual/org registration selection.",
        grant.into(),
    ))
}

// ============================================================================
// Sign in / out
// ============================================================================

/// POST /signin/password
pub async fn sign_in<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<DataBody<SignInData>>,
) -> AuthResult<ApiResponse<TokenGrantResponse>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());
    let grant = use_case
        .execute(SignInInput {
            email: req.data.email,
            password: req.data.password,
        })
        .await?;

    Ok(ApiResponse::new("User successfully logged in.", grant.into()))
}

/// POST /signout
pub async fn sign_out<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(auth): Extension<Authenticated>,
) -> AuthResult<ApiResponse<()>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    SignOutUseCase::new(state.repo.clone())
        .execute(&auth.claims)
        .await?;

    Ok(ApiResponse::message("Signed out successfully."))
}

// ============================================================================
// Passwords
// ============================================================================

/// POST /signin/forgot
pub async fn forgot_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<DataBody<EmailData>>,
) -> AuthResult<ApiResponse<()>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case =
        PasswordResetUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    let email = use_case.request_code(req.data.email.as_deref()).await?;

    Ok(ApiResponse::message(format!("Code sent successfully to {email}")))
}

/// POST /signin/forgot/confirm
pub async fn confirm_reset_code<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Json(req): Json<DataBody<VerifyCodeData>>,
) -> AuthResult<ApiResponse<TokenGrantResponse>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case =
        PasswordResetUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    let grant = use_case
        .confirm_code(&req.data.email, req.data.token.as_deref())
        .await?;

    Ok(ApiResponse::new("Token accepted", grant.into()))
}

/// POST /signin/forgot/password (requires a `/reset` token)
pub async fn reset_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(auth): Extension<Authenticated>,
    Json(req): Json<ResetPasswordRequest>,
) -> AuthResult<ApiResponse<()>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case =
        PasswordResetUseCase::new(state.repo.clone(), state.mailer.clone(), state.config.clone());
    use_case
        .reset_password(
            &auth.claims,
            auth.user.user_id,
            req.password,
            &req.confirm_password,
        )
        .await?;

    Ok(ApiResponse::message(
        "Password successfully updated. Go to sign in screen.",
    ))
}

/// POST /profile/edit/password
pub async fn change_password<R, M>(
    State(state): State<AuthAppState<R, M>>,
    Extension(auth): Extension<Authenticated>,
    Json(req): Json<ChangePasswordRequest>,
) -> AuthResult<ApiResponse<()>>
where
    R: AuthStore,
    M: Mailer + Clone + Send + Sync + 'static,
{
    let use_case = ChangePasswordUseCase::new(state.repo.clone(), state.config.clone());
    use_case
        .execute(
            auth.user.user_id,
            ChangePasswordInput {
                old_password: req.old_password,
                new_password: req.new_password,
                confirm_password: req.confirm_password,
            },
        )
        .await?;

    Ok(ApiResponse::message("Password successfully updated."))
}
