//! # Ticklist Shared Library
//!
//! Domain types, persistence and authentication primitives used by the
//! Ticklist API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing and policy, session tokens, sign-up/sign-in flows
//! - `db`: Connection pool and migrations
//! - `models`: Database rows and their PostgreSQL queries
//! - `store`: Storage traits with PostgreSQL and in-memory backends
//! - `tasks`: Ownership-scoped task operations
//! - `validation`: User-facing field errors

pub mod auth;
pub mod db;
pub mod models;
pub mod store;
pub mod tasks;
pub mod validation;

/// Current version of the Ticklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
