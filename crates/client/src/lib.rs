//! HTTP client for the EduNexus API with session handling.
//!
//! [`ApiClient`] attaches the current access token to every call and, when a
//! call is rejected with 401, refreshes the access token once and replays the
//! call. If the refresh fails the session is cleared and
//! [`ClientError::SessionExpired`] tells the caller to show the sign-in view.

pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod token_store;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::SessionContext;
pub use token_store::{FileTokenStore, MemoryTokenStore, RefreshTokenStore};
