//! Login, refresh, logout and "who am I", orchestrated over the token codec,
//! password verification and the two storage seams.
//!
//! Refresh-token lifecycle: issued at login, valid until its stored
//! `expires_at` (and its embedded `exp`), then terminal once deleted at logout
//! or expired. Refresh does not rotate the token: the same refresh token can
//! mint access tokens repeatedly until logout or expiry.

use std::sync::Arc;

use chrono::{Duration, Utc};
use edunexus_core::error::{AuthFailure, CoreError};
use edunexus_core::identity::UserProfile;
use edunexus_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{JwtConfig, TokenCodec, TokenError, TokenKind};
use crate::auth::password::verify_password;
use crate::auth::store::{SessionStore, UserStore};
use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh` and `POST /auth/logout`.
///
/// The token is optional at the JSON level so each endpoint can answer a
/// missing token with its own error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Successful login: the public profile plus both tokens.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

const LOGOUT_MESSAGE: &str = "Logged out successfully";

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: Arc<dyn SessionStore>,
    tokens: TokenCodec,
    session_ttl: Duration,
}

fn unauthorized(failure: AuthFailure) -> AppError {
    AppError::Core(CoreError::Unauthorized(failure))
}

fn token_internal(e: TokenError) -> AppError {
    AppError::InternalError(format!("Token generation error: {e}"))
}

impl AuthService {
    pub fn new(
        config: &JwtConfig,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            users,
            sessions,
            tokens: TokenCodec::new(config),
            session_ttl: Duration::days(config.session_expiry_days),
        }
    }

    /// The codec used to verify bearer tokens on protected routes.
    pub fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    /// Authenticate by email and password and open a new session.
    ///
    /// Unknown email, deactivated account and wrong password all fail with the
    /// same [`AuthFailure::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::debug!("Login rejected: unknown email");
            return Err(unauthorized(AuthFailure::InvalidCredentials));
        };

        if !user.is_active {
            tracing::debug!(user_id = user.id, "Login rejected: account inactive");
            return Err(unauthorized(AuthFailure::InvalidCredentials));
        }

        let password_valid = verify_password(password, &user.password_hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
        if !password_valid {
            tracing::debug!(user_id = user.id, "Login rejected: wrong password");
            return Err(unauthorized(AuthFailure::InvalidCredentials));
        }

        let profile = user
            .to_profile()
            .map_err(|e| AppError::InternalError(format!("Corrupt user row {}: {e}", user.id)))?;
        let identity = profile.identity();

        let access_token = self
            .tokens
            .issue_access_token(&identity)
            .map_err(token_internal)?;
        let refresh_token = self
            .tokens
            .issue_refresh_token(&identity)
            .map_err(token_internal)?;

        let expires_at = Utc::now() + self.session_ttl;
        self.sessions
            .create(&refresh_token, user.id, expires_at)
            .await?;

        // The session already exists; a lost login timestamp must not strand it.
        if let Err(e) = self.users.record_login(user.id).await {
            tracing::warn!(user_id = user.id, error = %e, "Failed to record login time");
        }

        tracing::info!(user_id = user.id, role = %identity.role, "User logged in");

        Ok(LoginResponse {
            user: profile,
            access_token,
            refresh_token,
        })
    }

    /// Mint a new access token from a refresh token.
    ///
    /// Both the token's embedded expiry and the stored session expiry must be
    /// in the future. The refresh token itself is left untouched.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<RefreshResponse> {
        let identity = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| unauthorized(AuthFailure::InvalidRefreshToken))?;

        let Some(session) = self.sessions.find_by_token(refresh_token).await? else {
            tracing::debug!(user_id = identity.user_id, "Refresh rejected: no session");
            return Err(unauthorized(AuthFailure::InvalidRefreshToken));
        };

        if session.is_expired_at(Utc::now()) {
            tracing::debug!(user_id = identity.user_id, "Refresh rejected: session expired");
            return Err(unauthorized(AuthFailure::InvalidRefreshToken));
        }

        if session.user_id != identity.user_id {
            tracing::warn!(
                session_user = session.user_id,
                token_user = identity.user_id,
                "Refresh rejected: session owner mismatch"
            );
            return Err(unauthorized(AuthFailure::InvalidRefreshToken));
        }

        let access_token = self
            .tokens
            .issue_access_token(&identity)
            .map_err(token_internal)?;

        tracing::debug!(user_id = identity.user_id, "Access token refreshed");

        Ok(RefreshResponse { access_token })
    }

    /// Delete the session for `refresh_token`.
    ///
    /// A token with no session counts as already logged out and still succeeds;
    /// only storage faults fail.
    pub async fn logout(&self, refresh_token: &str) -> AppResult<LogoutResponse> {
        if self.sessions.delete_by_token(refresh_token).await? {
            tracing::info!("Session closed");
        } else {
            tracing::debug!("Logout for unknown session, treating as already logged out");
        }

        Ok(LogoutResponse {
            message: LOGOUT_MESSAGE,
        })
    }

    /// Public profile of an already-authenticated user, or `None` if the row is gone.
    pub async fn get_identity(&self, user_id: DbId) -> AppResult<Option<UserProfile>> {
        let Some(user) = self.users.find_by_id(user_id).await? else {
            return Ok(None);
        };
        let profile = user
            .to_profile()
            .map_err(|e| AppError::InternalError(format!("Corrupt user row {}: {e}", user.id)))?;
        Ok(Some(profile))
    }
}
