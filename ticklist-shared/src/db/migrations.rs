/// Embedded database migrations
///
/// The SQL files under `ticklist-shared/migrations/` are compiled into the
/// binary with `sqlx::migrate!` and applied at startup.
///
/// ```text
/// 20250101000000_create_users.sql
/// 20250101000001_create_tasks.sql     tasks.user_id -> users.id ON DELETE CASCADE
/// 20250101000002_create_sessions.sql  sessions.user_id -> users.id ON DELETE CASCADE
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Applies all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("Database schema is up to date");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Number of migrations compiled into this build
pub fn embedded_migration_count() -> usize {
    sqlx::migrate!("./migrations").iter().count()
}

/// Creates the database named in `database_url` if it is missing
///
/// Meant for development; production databases are provisioned separately.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Database already exists");
        return Ok(());
    }

    info!("Database does not exist, creating it");
    Postgres::create_database(database_url).await?;
    Ok(())
}
