/// Database layer for Ticklist
///
/// - `pool`: PostgreSQL connection pool with a startup health check
/// - `migrations`: Embedded sqlx migrations (users, tasks, sessions)
///
/// Row types and their queries live in the crate-level `models` module.

pub mod migrations;
pub mod pool;
