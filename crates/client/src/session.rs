//! In-memory session state owned by one [`ApiClient`](crate::ApiClient).
//!
//! Set on login and on every successful refresh; cleared on logout and when a
//! refresh fails. Nothing here is persisted.

use edunexus_core::identity::UserProfile;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct SessionState {
    access_token: Option<String>,
    user: Option<UserProfile>,
}

/// Current access token and signed-in user.
#[derive(Debug, Default)]
pub struct SessionContext {
    state: RwLock<SessionState>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.read().await.access_token.clone()
    }

    pub async fn set_access_token(&self, token: String) {
        self.state.write().await.access_token = Some(token);
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.state.read().await.user.clone()
    }

    pub async fn set_user(&self, user: UserProfile) {
        self.state.write().await.user = Some(user);
    }

    pub async fn is_authenticated(&self) -> bool {
        let state = self.state.read().await;
        state.access_token.is_some() && state.user.is_some()
    }

    pub async fn clear(&self) {
        *self.state.write().await = SessionState::default();
    }
}

#[cfg(test)]
mod tests {
    use edunexus_core::roles::Role;

    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            email: "admin@edunexus.com".to_string(),
            role: Role::Admin,
            first_name: "System".to_string(),
            last_name: "Admin".to_string(),
            first_name_ne: None,
            last_name_ne: None,
        }
    }

    #[tokio::test]
    async fn test_set_and_clear() {
        let session = SessionContext::new();
        assert!(!session.is_authenticated().await);

        session.set_access_token("a1".to_string()).await;
        session.set_user(profile()).await;
        assert!(session.is_authenticated().await);
        assert_eq!(session.access_token().await.as_deref(), Some("a1"));

        session.clear().await;
        assert!(session.access_token().await.is_none());
        assert!(session.user().await.is_none());
    }
}
