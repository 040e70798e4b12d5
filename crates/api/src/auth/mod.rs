//! Authentication primitives and the auth service.
//!
//! - [`jwt`] -- access/refresh token issuance and verification.
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`store`] -- user and session storage seams with PostgreSQL implementations.
//! - [`service`] -- login, refresh, logout and identity lookup.

pub mod jwt;
pub mod password;
pub mod service;
pub mod store;
