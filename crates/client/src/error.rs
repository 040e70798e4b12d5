/// Errors from [`ApiClient`](crate::ApiClient) calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Refreshing the access token failed; all local session state was cleared.
    #[error("session expired, sign in again")]
    SessionExpired,

    /// The durable refresh-token store could not be read or written.
    #[error("refresh token storage failed: {0}")]
    Storage(#[from] std::io::Error),
}
