//! Identity payload embedded in tokens, and the public user profile.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::types::DbId;

/// The minimal claim set carried by every access and refresh token.
///
/// Attached to a request once its bearer token has been verified and dropped
/// with the request. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: DbId,
    pub email: String,
    pub role: Role,
}

/// Public projection of a user row. Never contains the password hash.
///
/// Returned by login and by `GET /auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: DbId,
    pub email: String,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub first_name_ne: Option<String>,
    #[serde(default)]
    pub last_name_ne: Option<String>,
}

impl UserProfile {
    /// The identity payload to embed in tokens for this user.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_serializes_camel_case() {
        let profile = UserProfile {
            id: 7,
            email: "teacher@edunexus.com".to_string(),
            role: Role::Teacher,
            first_name: "Sita".to_string(),
            last_name: "Sharma".to_string(),
            first_name_ne: Some("सीता".to_string()),
            last_name_ne: None,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["firstName"], "Sita");
        assert_eq!(json["firstNameNe"], "सीता");
        assert!(json["lastNameNe"].is_null());
        assert_eq!(json["role"], "TEACHER");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_profile_accepts_missing_nepali_names() {
        let json = serde_json::json!({
            "id": 1,
            "email": "admin@edunexus.com",
            "role": "ADMIN",
            "firstName": "System",
            "lastName": "Admin",
        });
        let profile: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(profile.first_name_ne, None);
        assert_eq!(
            profile.identity(),
            Identity {
                user_id: 1,
                email: "admin@edunexus.com".to_string(),
                role: Role::Admin,
            }
        );
    }
}
