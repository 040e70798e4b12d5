//! Bearer-token authentication for protected routes.
//!
//! [`authenticate`] runs as route middleware: it verifies the access token in
//! the `Authorization` header and stores the resulting [`AuthUser`] in the
//! request extensions before any handler runs. Handlers then take
//! [`AuthUser`] as an extractor.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use edunexus_core::error::{AuthFailure, CoreError};
use edunexus_core::identity::Identity;
use edunexus_core::roles::Role;
use edunexus_core::types::DbId;

use crate::auth::jwt::{TokenCodec, TokenKind};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user attached to the request by [`authenticate`].
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub role: Role,
}

impl From<Identity> for AuthUser {
    fn from(identity: Identity) -> Self {
        Self {
            user_id: identity.user_id,
            email: identity.email,
            role: identity.role,
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AppError::Core(CoreError::Unauthorized(
            AuthFailure::MissingToken,
        )))
}

/// Verify the bearer access token in `headers`.
pub fn authenticate_headers(
    headers: &HeaderMap,
    tokens: &TokenCodec,
) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers)?;
    let identity = tokens
        .verify(token, TokenKind::Access)
        .map_err(|_| AppError::Core(CoreError::Unauthorized(AuthFailure::InvalidToken)))?;
    Ok(identity.into())
}

/// Route middleware: reject unauthenticated requests, otherwise attach [`AuthUser`].
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate_headers(request.headers(), state.auth.tokens())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    /// Uses the identity attached by [`authenticate`]; on routes without the
    /// middleware the header is verified here instead.
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }
        authenticate_headers(&parts.headers, state.auth.tokens())
    }
}
