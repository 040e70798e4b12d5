//! Authentication and authorization middleware.
//!
//! - [`auth::authenticate`] -- verifies the bearer access token and attaches [`auth::AuthUser`].
//! - [`rbac::role_gate`] -- rejects identities whose role is outside a [`rbac::RoleGate`].

pub mod auth;
pub mod rbac;
