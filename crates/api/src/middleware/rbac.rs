//! Role gates.
//!
//! A [`RoleGate`] is the set of roles allowed on a route, fixed when the route
//! is registered. [`role_gate`] enforces it and must be layered inside
//! [`authenticate`](super::auth::authenticate) so the identity is already
//! attached.
//!
//! ```ignore
//! let admin_only = Router::new()
//!     .route("/reports", get(reports))
//!     .route_layer(from_fn_with_state(RoleGate::new([Role::Admin]), role_gate))
//!     .route_layer(from_fn_with_state(state.clone(), authenticate));
//! ```

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use edunexus_core::error::CoreError;
use edunexus_core::roles::Role;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};

/// The roles allowed through a route.
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Arc<[Role]>,
}

impl RoleGate {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    /// Forbidden unless an identity is present and its role is allowed.
    pub fn check(&self, user: Option<&AuthUser>) -> AppResult<()> {
        match user {
            Some(user) if self.allows(user.role) => Ok(()),
            Some(user) => {
                tracing::debug!(user_id = user.user_id, role = %user.role, "Role gate rejected request");
                Err(AppError::Core(CoreError::Forbidden("Forbidden".into())))
            }
            None => Err(AppError::Core(CoreError::Forbidden("Forbidden".into()))),
        }
    }
}

/// Route middleware enforcing the [`RoleGate`] passed as its state.
pub async fn role_gate(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    gate.check(request.extensions().get::<AuthUser>())?;
    Ok(next.run(request).await)
}
