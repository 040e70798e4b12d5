//! Domain primitives shared by the EduNexus server and client crates.
//!
//! - [`types`] -- id and timestamp aliases.
//! - [`roles`] -- the closed set of user roles.
//! - [`identity`] -- the token identity payload and public user profile.
//! - [`error`] -- the internal error taxonomy.

pub mod error;
pub mod identity;
pub mod roles;
pub mod types;
