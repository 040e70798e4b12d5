//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use edunexus_core::error::{AuthFailure, CoreError};
use edunexus_core::identity::UserProfile;

use crate::auth::service::{
    LoginRequest, LoginResponse, LogoutResponse, RefreshResponse, RefreshTokenRequest,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns the profile and both tokens.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(input) = payload?;
    let response = state.auth.login(&input.email, &input.password).await?;
    Ok(Json(response))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token for a new access token. A missing token is
/// just another invalid one.
pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> AppResult<Json<RefreshResponse>> {
    let Json(input) = payload?;
    let refresh_token = input
        .refresh_token
        .ok_or(AppError::Core(CoreError::Unauthorized(
            AuthFailure::InvalidRefreshToken,
        )))?;
    let response = state.auth.refresh(&refresh_token).await?;
    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Delete the session for the given refresh token. Unknown tokens also succeed.
pub async fn logout(
    State(state): State<AppState>,
    payload: Result<Json<RefreshTokenRequest>, JsonRejection>,
) -> AppResult<Json<LogoutResponse>> {
    let Json(input) = payload?;
    let refresh_token = input.refresh_token.ok_or(AppError::Core(CoreError::Validation(
        "refreshToken is required".into(),
    )))?;
    let response = state.auth.logout(&refresh_token).await?;
    Ok(Json(response))
}

/// GET /api/auth/me
///
/// Public profile of the authenticated user.
pub async fn me(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<UserProfile>> {
    let profile = state
        .auth
        .get_identity(user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(profile))
}
