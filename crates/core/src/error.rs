use crate::types::DbId;

/// Why a caller was refused authentication.
///
/// The variant is kept for logging; the display text is what the client sees,
/// and it never says which individual check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// Unknown email, inactive account, or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No `Authorization: Bearer` header.
    #[error("No token provided")]
    MissingToken,

    /// Access token malformed, expired, of the wrong kind, or badly signed.
    #[error("Invalid token")]
    InvalidToken,

    /// Refresh token failed verification, or its session is gone or expired.
    #[error("Invalid refresh token")]
    InvalidRefreshToken,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(AuthFailure),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
