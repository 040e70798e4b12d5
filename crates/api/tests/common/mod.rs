#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use edunexus_api::auth::jwt::JwtConfig;
use edunexus_api::auth::password::hash_password;
use edunexus_api::auth::service::AuthService;
use edunexus_api::auth::store::{SessionStore, UserStore};
use edunexus_api::config::ServerConfig;
use edunexus_api::error::{AppError, AppResult};
use edunexus_api::router::build_app_router;
use edunexus_api::state::AppState;
use edunexus_core::error::CoreError;
use edunexus_core::roles::Role;
use edunexus_core::types::{DbId, Timestamp};
use edunexus_db::models::refresh_token::RefreshToken;
use edunexus_db::models::user::User;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "test-access-secret-that-is-long-enough".to_string(),
        refresh_secret: "test-refresh-secret-that-is-long-enough".to_string(),
        access_token_expiry_mins: 15,
        refresh_token_expiry_days: 7,
        session_expiry_days: 7,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: test_jwt_config(),
    }
}

// ---------------------------------------------------------------------------
// In-memory stores
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
    /// When set, `record_login` fails like a storage fault.
    failing_record_login: AtomicBool,
}

impl MemoryUserStore {
    /// Insert a user whose password is [`TEST_PASSWORD`].
    pub fn insert(&self, email: &str, role: Role, is_active: bool) -> User {
        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role: role.as_str().to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            first_name_ne: Some("परीक्षण".to_string()),
            last_name_ne: None,
            is_active,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    pub fn remove(&self, id: DbId) {
        self.users.lock().unwrap().retain(|u| u.id != id);
    }

    pub fn get(&self, id: DbId) -> Option<User> {
        self.users.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    pub fn set_record_login_failing(&self, failing: bool) {
        self.failing_record_login.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: DbId) -> AppResult<Option<User>> {
        Ok(self.get(id))
    }

    async fn record_login(&self, id: DbId) -> AppResult<()> {
        if self.failing_record_login.load(Ordering::SeqCst) {
            return Err(AppError::InternalError("user store unavailable".into()));
        }
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.last_login_at = Some(Utc::now());
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, RefreshToken>>,
    next_id: AtomicI64,
    /// When set, every call fails like a storage fault.
    failing: AtomicBool,
}

impl MemorySessionStore {
    pub fn get(&self, token: &str) -> Option<RefreshToken> {
        self.sessions.lock().unwrap().get(token).cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    /// Move the stored expiry of `token` into the past.
    pub fn expire(&self, token: &str) {
        if let Some(session) = self.sessions.lock().unwrap().get_mut(token) {
            session.expires_at = Utc::now() - Duration::seconds(1);
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_fault(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::InternalError("session store unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, token: &str, user_id: DbId, expires_at: Timestamp) -> AppResult<()> {
        self.check_fault()?;
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(token) {
            return Err(CoreError::Conflict("Refresh token already exists".into()).into());
        }
        let session = RefreshToken {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            token: token.to_string(),
            user_id,
            expires_at,
            created_at: Utc::now(),
        };
        sessions.insert(token.to_string(), session);
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> AppResult<Option<RefreshToken>> {
        self.check_fault()?;
        Ok(self.get(token))
    }

    async fn delete_by_token(&self, token: &str) -> AppResult<bool> {
        self.check_fault()?;
        Ok(self.sessions.lock().unwrap().remove(token).is_some())
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Stores and service behind a test app, kept so tests can inspect them.
pub struct TestContext {
    pub users: Arc<MemoryUserStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::default());
        let sessions = Arc::new(MemorySessionStore::default());
        let config = test_config();
        let auth = AuthService::new(&config.jwt, users.clone(), sessions.clone());
        let state = AppState {
            config: Arc::new(config),
            auth: Arc::new(auth),
        };
        Self {
            users,
            sessions,
            state,
        }
    }

    pub fn auth(&self) -> &AuthService {
        &self.state.auth
    }

    /// The full application router with the production middleware stack.
    pub fn app(&self) -> Router {
        build_app_router(self.state.clone(), &self.state.config)
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_header(app: Router, uri: &str, authorization: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", authorization)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    get_with_header(app, uri, &format!("Bearer {token}")).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
