/// Database models for Ticklist
///
/// Each model owns its row type and the PostgreSQL queries that read or
/// write it. Higher layers reach them through `store::PgStore`.
///
/// - `user`: Registered accounts (credential store rows)
/// - `task`: To-do items, each owned by exactly one user
/// - `session`: Server-side session records backing the session cookie

pub mod session;
pub mod task;
pub mod user;
