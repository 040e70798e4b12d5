//! Route definitions for the `/auth` resource.

use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::middleware::auth::authenticate;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /login    -> login
/// POST /refresh  -> refresh
/// POST /logout   -> logout
/// GET  /me       -> me (requires bearer access token)
/// ```
pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(auth::me))
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        .route("/logout", post(auth::logout))
        .merge(protected)
}
