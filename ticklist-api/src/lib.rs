//! # Ticklist API Server Library
//!
//! HTTP surface of Ticklist: registration, sign-in, sessions and the
//! per-user task list.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `cookies`: Session and flash cookies
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Security headers
//! - `routes`: Route handlers
//! - `session`: Session extractor and the access guard

pub mod app;
pub mod config;
pub mod cookies;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
