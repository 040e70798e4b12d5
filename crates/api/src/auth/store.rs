//! Storage seams used by the auth service.
//!
//! [`UserStore`] and [`SessionStore`] describe the few row-store calls the
//! auth flow needs. The PostgreSQL implementations delegate to the
//! repositories in `edunexus_db`; tests plug in in-memory ones.

use async_trait::async_trait;
use edunexus_core::error::CoreError;
use edunexus_core::types::{DbId, Timestamp};
use edunexus_db::models::refresh_token::{CreateRefreshToken, RefreshToken};
use edunexus_db::models::user::User;
use edunexus_db::repositories::{RefreshTokenRepo, UserRepo};
use edunexus_db::DbPool;

use crate::error::AppResult;

/// Read access to user rows plus the login bookkeeping write.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_by_id(&self, id: DbId) -> AppResult<Option<User>>;

    /// Record a successful login on the user row.
    async fn record_login(&self, id: DbId) -> AppResult<()>;
}

/// Persisted refresh-token sessions, keyed by the token string.
///
/// Each call touches a single row.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Insert a session. Fails with [`CoreError::Conflict`] if the token exists.
    async fn create(&self, token: &str, user_id: DbId, expires_at: Timestamp) -> AppResult<()>;

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>>;

    /// Delete a session. Returns `false` when no row matched.
    async fn delete_by_token(&self, token: &str) -> AppResult<bool>;
}

/// [`UserStore`] backed by the `users` table.
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn find_by_id(&self, id: DbId) -> AppResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn record_login(&self, id: DbId) -> AppResult<()> {
        Ok(UserRepo::record_login(&self.pool, id).await?)
    }
}

/// [`SessionStore`] backed by the `refresh_tokens` table.
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn create(&self, token: &str, user_id: DbId, expires_at: Timestamp) -> AppResult<()> {
        let input = CreateRefreshToken {
            token: token.to_string(),
            user_id,
            expires_at,
        };
        match RefreshTokenRepo::create(&self.pool, &input).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(
                CoreError::Conflict("Refresh token already exists".into()).into(),
            ),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        Ok(RefreshTokenRepo::find_by_token(&self.pool, token).await?)
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        Ok(RefreshTokenRepo::delete_by_token(&self.pool, token).await?)
    }
}
