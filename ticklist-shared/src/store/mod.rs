/// Storage traits and backends
///
/// The application talks to persistence only through these traits. One
/// `Arc<dyn Store>` is built at startup and injected into the HTTP state, so
/// there is no process-wide database handle.
///
/// # Backends
///
/// - [`PgStore`]: PostgreSQL via sqlx, used in production
/// - [`MemoryStore`]: in-process tables with the same semantics, used by tests
///
/// Method names carry their entity (`find_user_by_id`, `list_tasks`, ...) so
/// calls stay unambiguous on `dyn Store`, which sees all three traits at once.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;

use crate::models::{
    session::{NewSession, SessionRecord},
    task::{Task, TaskId},
    user::{CreateUserOutcome, NewUser, User, UserId},
};

/// Error type for storage operations
///
/// Always a fault of the backend, never a user mistake. Callers surface it as
/// a failed request.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Credential store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user unless the (normalized) email is already registered
    async fn create_user(&self, data: NewUser) -> Result<CreateUserOutcome, StoreError>;

    /// Looks a user up by normalized email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

/// Task persistence, always filtered by owner
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, owner: UserId, title: &str) -> Result<Task, StoreError>;

    /// Tasks of `owner` in insertion order
    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, StoreError>;

    /// Flips completion; `None` when `id` does not belong to `owner`
    async fn toggle_task(&self, owner: UserId, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Deletes; `false` when `id` does not belong to `owner`
    async fn delete_task(&self, owner: UserId, id: TaskId) -> Result<bool, StoreError>;
}

/// Server-side session records
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, data: NewSession) -> Result<SessionRecord, StoreError>;

    /// Finds a session by token hash, ignoring expired ones
    async fn find_active_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, StoreError>;

    async fn delete_session(&self, token_hash: &str) -> Result<bool, StoreError>;

    /// Drops expired sessions and returns how many were removed
    async fn purge_expired_sessions(&self) -> Result<u64, StoreError>;
}

/// Everything the application needs from persistence
#[async_trait]
pub trait Store: UserStore + TaskStore + SessionStore {
    /// Checks that the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
