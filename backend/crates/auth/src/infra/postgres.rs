//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::{
    registration::Registration,
    reset::ResetToken,
    user::{NewUser, User},
};
use crate::domain::repository::{
    RegistrationRepository, ResetRepository, TokenBlacklistRepository, UserRepository,
};
use crate::domain::value_object::{
    email::Email, one_time_code::OneTimeCode, username::Username,
};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove blacklist entries for tokens that have expired anyway
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM token_blacklist WHERE expires_at < now()")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(tokens_deleted = deleted, "Cleaned up expired blacklisted tokens");

        Ok(deleted)
    }
}

// ============================================================================
// Registration Repository Implementation
// ============================================================================

impl RegistrationRepository for PgAuthRepository {
    async fn find_registration(&self, email: &Email) -> AuthResult<Option<Registration>> {
        let row = sqlx::query_as::<_, RegistrationRow>(
            r#"
            SELECT email, email_flag, verification_token, expiry_date
            FROM registration
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RegistrationRow::into_registration))
    }

    async fn save_registration(&self, registration: &Registration) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO registration (email, email_flag, verification_token, expiry_date)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (email) DO UPDATE SET
                email_flag = EXCLUDED.email_flag,
                verification_token = EXCLUDED.verification_token,
                expiry_date = EXCLUDED.expiry_date
            "#,
        )
        .bind(registration.email.as_str())
        .bind(registration.email_flag)
        .bind(&registration.verification.code)
        .bind(registration.expires_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn insert_user(&self, user: &NewUser) -> AuthResult<User> {
        let mut tx = self.pool.begin().await?;

        let (id, date_registered) = sqlx::query_as::<_, (i32, DateTime<Utc>)>(
            r#"
            INSERT INTO users (email, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, date_registered
            "#,
        )
        .bind(user.email.as_str())
        .bind(user.username.as_str())
        .bind(user.password_hash.as_phc_string())
        .fetch_one(&mut *tx)
        .await?;

        // Every user starts with notifications and emails off
        sqlx::query("INSERT INTO settings (user_id, email, notifications) VALUES ($1, 0, 0)")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user.clone().into_user(UserId::new(id), date_registered))
    }

    async fn find_user_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, password_hash, date_registered
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_user_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, username, password_hash, date_registered
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn has_profile(&self, user_id: UserId) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM individual WHERE user_id = $1)
                OR EXISTS(SELECT 1 FROM organisation WHERE user_id = $1)
            "#,
        )
        .bind(user_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn update_password_hash(
        &self,
        user_id: UserId,
        password_hash: &HashedPassword,
    ) -> AuthResult<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(user_id.value())
            .bind(password_hash.as_phc_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Reset Repository Implementation
// ============================================================================

impl ResetRepository for PgAuthRepository {
    async fn insert_reset(&self, reset: &ResetToken) -> AuthResult<()> {
        sqlx::query(
            "INSERT INTO reset (user_id, password_token, expiry_date) VALUES ($1, $2, $3)",
        )
        .bind(reset.user_id.value())
        .bind(&reset.code.code)
        .bind(reset.code.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_reset(&self, user_id: UserId) -> AuthResult<Option<ResetToken>> {
        let row = sqlx::query_as::<_, ResetRow>(
            r#"
            SELECT user_id, password_token, expiry_date
            FROM reset
            WHERE user_id = $1
            ORDER BY expiry_date DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ResetRow::into_reset))
    }
}

// ============================================================================
// Token Blacklist Repository Implementation
// ============================================================================

impl TokenBlacklistRepository for PgAuthRepository {
    async fn blacklist_token(&self, jti: &str, expires_at: DateTime<Utc>) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO token_blacklist (jti, expires_at)
            VALUES ($1, $2)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM token_blacklist WHERE jti = $1)",
        )
        .bind(jti)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn purge_expired_blacklist(&self) -> AuthResult<u64> {
        self.cleanup_expired().await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct RegistrationRow {
    email: String,
    email_flag: bool,
    verification_token: String,
    expiry_date: DateTime<Utc>,
}

impl RegistrationRow {
    fn into_registration(self) -> Registration {
        Registration {
            email: Email::from_db(self.email),
            email_flag: self.email_flag,
            verification: OneTimeCode {
                code: self.verification_token,
                expires_at: self.expiry_date,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    username: String,
    password_hash: String,
    date_registered: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash for user {}: {e}", self.id)))?;

        Ok(User {
            id: UserId::new(self.id),
            email: Email::from_db(self.email),
            username: Username::from_db(self.username),
            password_hash,
            date_registered: self.date_registered,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ResetRow {
    user_id: i32,
    password_token: String,
    expiry_date: DateTime<Utc>,
}

impl ResetRow {
    fn into_reset(self) -> ResetToken {
        ResetToken {
            user_id: UserId::new(self.user_id),
            code: OneTimeCode {
                code: self.password_token,
                expires_at: self.expiry_date,
            },
        }
    }
}
