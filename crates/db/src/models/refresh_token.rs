//! Refresh-token session model.

use edunexus_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A session row from the `refresh_tokens` table, keyed by the token itself.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshToken {
    pub id: DbId,
    pub token: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}

impl RefreshToken {
    /// Whether the stored expiry has passed at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.expires_at <= now
    }
}

/// DTO for persisting a newly issued refresh token.
pub struct CreateRefreshToken {
    pub token: String,
    pub user_id: DbId,
    pub expires_at: Timestamp,
}
