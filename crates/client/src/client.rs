//! Authenticated HTTP calls against the EduNexus API.
//!
//! Every call made through [`ApiClient::send`] carries the current access
//! token. A 401 triggers one refresh followed by one replay of the same call;
//! the retry flag lives in the call itself so concurrent calls never suppress
//! each other's retry. `login`, `logout` and the refresh request go straight
//! to the server and never enter that path.

use std::sync::Arc;

use edunexus_core::identity::UserProfile;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::session::SessionContext;
use crate::token_store::RefreshTokenStore;

#[derive(Debug, Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    user: UserProfile,
    access_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
}

/// HTTP client holding one user's session.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionContext,
    refresh_store: Arc<dyn RefreshTokenStore>,
}

impl ApiClient {
    pub fn new(
        config: ClientConfig,
        refresh_store: Arc<dyn RefreshTokenStore>,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
            session: SessionContext::new(),
            refresh_store,
        })
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Sign in, keeping the access token in memory and persisting the refresh
    /// token.
    ///
    /// A rejected password surfaces as `ClientError::Api { status: 401, .. }`;
    /// no refresh is attempted.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let response = self
            .http
            .post(self.url("/auth/login"))
            .json(&LoginBody { email, password })
            .send()
            .await?;
        let body: LoginResponse = Self::parse_response(response).await?;

        self.refresh_store.save(&body.refresh_token)?;
        self.session.set_access_token(body.access_token).await;
        self.session.set_user(body.user.clone()).await;

        tracing::info!(user_id = body.user.id, "Signed in");
        Ok(body.user)
    }

    /// Revoke the refresh token on the server and clear local state.
    ///
    /// The server call is best effort; local state is cleared even when it
    /// fails. If the stored token cannot be read, the in-memory session is
    /// still cleared before the storage error is returned.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let stored = self.load_refresh_token().await?;

        if let Some(refresh_token) = stored {
            let result = self
                .http
                .post(self.url("/auth/logout"))
                .json(&RefreshBody {
                    refresh_token: &refresh_token,
                })
                .send()
                .await;

            match result {
                Ok(response) => {
                    if let Err(e) = Self::ensure_success(response).await {
                        tracing::warn!(error = %e, "Logout request rejected");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "Logout request failed"),
            }
        }

        self.clear().await
    }

    /// Rebuild the session from a persisted refresh token, e.g. at startup.
    ///
    /// Returns `Ok(None)` when there is nothing to restore or the stored token
    /// is no longer accepted; in the latter case local state has been cleared.
    pub async fn restore_session(&self) -> Result<Option<UserProfile>, ClientError> {
        if self.refresh_store.load()?.is_none() {
            return Ok(None);
        }

        match self.refresh_access_token().await {
            Ok(()) => {}
            Err(ClientError::SessionExpired) => return Ok(None),
            Err(e) => return Err(e),
        }

        match self.me().await {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                self.clear().await?;
                Err(e)
            }
        }
    }

    /// Fetch `/auth/me` and record the result as the signed-in user.
    pub async fn me(&self) -> Result<UserProfile, ClientError> {
        let user: UserProfile = self.get_json("/auth/me").await?;
        self.session.set_user(user.clone()).await;
        Ok(user)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(Method::GET, path, None).await?;
        Ok(response.json::<T>().await?)
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ClientError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        Ok(response.json::<T>().await?)
    }

    /// Send an authenticated request, refreshing and replaying it once on 401.
    ///
    /// Returns the successful response. A replay that is rejected again comes
    /// back as `ClientError::Api` without another refresh.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ClientError> {
        let mut retried = false;

        loop {
            let mut request = self.http.request(method.clone(), self.url(path));
            if let Some(token) = self.session.access_token().await {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            if response.status() == StatusCode::UNAUTHORIZED && !retried {
                retried = true;
                tracing::debug!(%method, path, "Access token rejected, refreshing");
                self.refresh_access_token().await?;
                continue;
            }

            return Self::ensure_success(response).await;
        }
    }

    // ---- private helpers ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange the persisted refresh token for a new access token.
    ///
    /// Any failure, including a missing refresh token, clears the session and
    /// yields [`ClientError::SessionExpired`]. An unreadable store clears the
    /// in-memory session and yields [`ClientError::Storage`].
    async fn refresh_access_token(&self) -> Result<(), ClientError> {
        let stored = self.load_refresh_token().await?;
        let Some(refresh_token) = stored else {
            tracing::info!("No refresh token stored, session expired");
            self.clear().await?;
            return Err(ClientError::SessionExpired);
        };

        let result = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&RefreshBody {
                refresh_token: &refresh_token,
            })
            .send()
            .await;

        let body = match result {
            Ok(response) => Self::parse_response::<RefreshResponse>(response).await,
            Err(e) => Err(e.into()),
        };

        match body {
            Ok(body) => {
                self.session.set_access_token(body.access_token).await;
                Ok(())
            }
            Err(e) => {
                tracing::info!(error = %e, "Refresh failed, session expired");
                self.clear().await?;
                Err(ClientError::SessionExpired)
            }
        }
    }

    /// Read the persisted refresh token, dropping the in-memory session if
    /// the store cannot be read.
    async fn load_refresh_token(&self) -> Result<Option<String>, ClientError> {
        match self.refresh_store.load() {
            Ok(stored) => Ok(stored),
            Err(e) => {
                self.session.clear().await;
                Err(e.into())
            }
        }
    }

    async fn clear(&self) -> Result<(), ClientError> {
        self.session.clear().await;
        self.refresh_store.clear()?;
        Ok(())
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
