//! Signed, time-bounded access and refresh tokens.
//!
//! Both kinds are HS256-signed JWTs carrying the [`Identity`] payload. Each
//! kind has its own signing secret and a `kind` claim, so an access token is
//! never accepted where a refresh token is required and vice versa.

use edunexus_core::identity::Identity;
use edunexus_core::roles::Role;
use edunexus_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::env_or;

/// Which signing context a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    pub email: String,
    pub role: Role,
    pub kind: TokenKind,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4); keeps refresh tokens distinct in storage.
    pub jti: String,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.sub,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Token errors. Every verification failure is the same variant.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired or invalid")]
    ExpiredOrInvalid,

    #[error("token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Configuration for token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret for access tokens.
    pub access_secret: String,
    /// HMAC-SHA256 secret for refresh tokens. Must differ from `access_secret`.
    pub refresh_secret: String,
    /// Access token lifetime in minutes (default: 15).
    pub access_token_expiry_mins: i64,
    /// Lifetime embedded in refresh tokens, in days (default: 7).
    pub refresh_token_expiry_days: i64,
    /// Offset of the stored session `expires_at`, in days (default: 7).
    pub session_expiry_days: i64,
}

const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 15;
const DEFAULT_REFRESH_EXPIRY_DAYS: i64 = 7;
const DEFAULT_SESSION_EXPIRY_DAYS: i64 = 7;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_REFRESH_SECRET`       | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `7`     |
    /// | `SESSION_EXPIRY_DAYS`      | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if either secret is missing or empty, or if both are equal.
    pub fn from_env() -> Self {
        let access_secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .expect("JWT_REFRESH_SECRET must be set in the environment");
        assert!(!access_secret.is_empty(), "JWT_SECRET must not be empty");
        assert!(
            !refresh_secret.is_empty(),
            "JWT_REFRESH_SECRET must not be empty"
        );
        assert_ne!(
            access_secret, refresh_secret,
            "JWT_SECRET and JWT_REFRESH_SECRET must differ"
        );

        Self {
            access_secret,
            refresh_secret,
            access_token_expiry_mins: env_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS),
            refresh_token_expiry_days: env_or(
                "JWT_REFRESH_EXPIRY_DAYS",
                DEFAULT_REFRESH_EXPIRY_DAYS,
            ),
            session_expiry_days: env_or("SESSION_EXPIRY_DAYS", DEFAULT_SESSION_EXPIRY_DAYS),
        }
    }
}

/// One signing context: a key pair plus the lifetime of tokens it issues.
struct SigningContext {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl SigningContext {
    fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }
}

/// HS256 only, and `exp` is enforced to the second.
fn strict_validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

/// Issues and verifies tokens. Built once at startup and shared read-only.
pub struct TokenCodec {
    access: SigningContext,
    refresh: SigningContext,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: SigningContext::new(
                &config.access_secret,
                config.access_token_expiry_mins * 60,
            ),
            refresh: SigningContext::new(
                &config.refresh_secret,
                config.refresh_token_expiry_days * 24 * 60 * 60,
            ),
            validation: strict_validation(),
        }
    }

    fn context(&self, kind: TokenKind) -> &SigningContext {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    pub fn issue_access_token(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue(identity, TokenKind::Access)
    }

    pub fn issue_refresh_token(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue(identity, TokenKind::Refresh)
    }

    fn issue(&self, identity: &Identity, kind: TokenKind) -> Result<String, TokenError> {
        let ctx = self.context(kind);
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: identity.user_id,
            email: identity.email.clone(),
            role: identity.role,
            kind,
            exp: now + ctx.ttl_secs,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &ctx.encoding).map_err(TokenError::Signing)
    }

    /// Verify signature, structure, expiry and kind, returning the payload.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.context(kind).decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(reason = ?e.kind(), ?kind, "Token rejected");
                TokenError::ExpiredOrInvalid
            })?;

        if data.claims.kind != kind {
            tracing::debug!(expected = ?kind, found = ?data.claims.kind, "Token rejected: wrong kind");
            return Err(TokenError::ExpiredOrInvalid);
        }

        Ok(data.claims.identity())
    }
}
