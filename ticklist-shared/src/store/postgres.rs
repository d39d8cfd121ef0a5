/// PostgreSQL-backed store
///
/// Thin adapter from the store traits to the model queries. Every mutation
/// is one SQL statement, so it is atomic without an explicit transaction.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{SessionStore, Store, StoreError, TaskStore, UserStore};
use crate::db::pool::health_check;
use crate::models::{
    session::{NewSession, SessionRecord},
    task::{Task, TaskId},
    user::{CreateUserOutcome, NewUser, User, UserId},
};

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool, for shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, data: NewUser) -> Result<CreateUserOutcome, StoreError> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, owner: UserId, title: &str) -> Result<Task, StoreError> {
        Ok(Task::create(&self.pool, owner, title).await?)
    }

    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, StoreError> {
        Ok(Task::list_by_owner(&self.pool, owner).await?)
    }

    async fn toggle_task(&self, owner: UserId, id: TaskId) -> Result<Option<Task>, StoreError> {
        Ok(Task::toggle_complete(&self.pool, owner, id).await?)
    }

    async fn delete_task(&self, owner: UserId, id: TaskId) -> Result<bool, StoreError> {
        Ok(Task::delete(&self.pool, owner, id).await?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert_session(&self, data: NewSession) -> Result<SessionRecord, StoreError> {
        Ok(SessionRecord::create(&self.pool, data).await?)
    }

    async fn find_active_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, StoreError> {
        Ok(SessionRecord::find_active(&self.pool, token_hash).await?)
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        Ok(SessionRecord::delete_by_token_hash(&self.pool, token_hash).await?)
    }

    async fn purge_expired_sessions(&self) -> Result<u64, StoreError> {
        Ok(SessionRecord::delete_expired(&self.pool).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(health_check(&self.pool).await?)
    }
}
