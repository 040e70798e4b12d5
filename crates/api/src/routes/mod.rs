pub mod auth;
pub mod health;

use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::middleware::auth::authenticate;
use crate::middleware::rbac::{role_gate, RoleGate};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (public)
/// /auth/me                                         current user (bearer token)
/// ```
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new().nest("/auth", auth::router(state))
}

/// Protect every route in `router`: authenticate the bearer token, then
/// enforce `gate`.
///
/// ```ignore
/// let admin = guarded(Router::new().route("/users", get(list_users)), &state, RoleGate::new([Role::Admin]));
/// ```
pub fn guarded(router: Router<AppState>, state: &AppState, gate: RoleGate) -> Router<AppState> {
    // The last layer added runs first.
    router
        .route_layer(from_fn_with_state(gate, role_gate))
        .route_layer(from_fn_with_state(state.clone(), authenticate))
}
