//! User entity model and DTOs.

use edunexus_core::identity::UserProfile;
use edunexus_core::roles::{Role, UnknownRole};
use edunexus_core::types::{DbId, Timestamp};
use serde::Deserialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`User::to_profile`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    /// Upper-case role name, constrained to `ADMIN`, `TEACHER` or `STUDENT`.
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub first_name_ne: Option<String>,
    pub last_name_ne: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Project the row onto its public fields.
    pub fn to_profile(&self) -> Result<UserProfile, UnknownRole> {
        let role: Role = self.role.parse()?;
        Ok(UserProfile {
            id: self.id,
            email: self.email.clone(),
            role,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            first_name_ne: self.first_name_ne.clone(),
            last_name_ne: self.last_name_ne.clone(),
        })
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub first_name_ne: Option<String>,
    pub last_name_ne: Option<String>,
}
