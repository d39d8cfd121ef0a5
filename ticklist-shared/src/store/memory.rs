/// In-memory store
///
/// Mirrors the PostgreSQL schema closely enough for tests: unique emails,
/// owner-filtered task queries, insertion-ordered ids, session expiry, and
/// cascading deletes when a user is removed. A single mutex guards all
/// tables; it is never held across an await point.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::BTreeMap;

use super::{SessionStore, Store, StoreError, TaskStore, UserStore};
use crate::models::{
    session::{NewSession, SessionRecord},
    task::{Task, TaskId},
    user::{CreateUserOutcome, NewUser, User, UserId},
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    tasks: BTreeMap<TaskId, Task>,
    sessions: Vec<SessionRecord>,
    next_user_id: UserId,
    next_task_id: TaskId,
}

/// Store that keeps everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users
    pub fn user_count(&self) -> usize {
        self.tables.lock().users.len()
    }

    /// Number of stored sessions, expired ones included
    pub fn session_count(&self) -> usize {
        self.tables.lock().sessions.len()
    }

    /// Removes a user together with their tasks and sessions
    pub fn remove_user(&self, id: UserId) -> bool {
        let mut tables = self.tables.lock();
        tables.tasks.retain(|_, task| task.user_id != id);
        tables.sessions.retain(|session| session.user_id != id);
        tables.users.remove(&id).is_some()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, data: NewUser) -> Result<CreateUserOutcome, StoreError> {
        let mut tables = self.tables.lock();

        if tables.users.values().any(|user| user.email == data.email) {
            return Ok(CreateUserOutcome::AlreadyExists);
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        Ok(CreateUserOutcome::Created(user))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables.users.values().find(|user| user.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.tables.lock().users.get(&id).cloned())
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, owner: UserId, title: &str) -> Result<Task, StoreError> {
        let mut tables = self.tables.lock();

        tables.next_task_id += 1;
        let task = Task {
            id: tables.next_task_id,
            user_id: owner,
            title: title.to_string(),
            complete: false,
            created_at: Utc::now(),
        };
        tables.tasks.insert(task.id, task.clone());

        Ok(task)
    }

    async fn list_tasks(&self, owner: UserId) -> Result<Vec<Task>, StoreError> {
        let tables = self.tables.lock();
        Ok(tables
            .tasks
            .values()
            .filter(|task| task.user_id == owner)
            .cloned()
            .collect())
    }

    async fn toggle_task(&self, owner: UserId, id: TaskId) -> Result<Option<Task>, StoreError> {
        let mut tables = self.tables.lock();

        Ok(tables
            .tasks
            .get_mut(&id)
            .filter(|task| task.user_id == owner)
            .map(|task| {
                task.complete = !task.complete;
                task.clone()
            }))
    }

    async fn delete_task(&self, owner: UserId, id: TaskId) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock();

        let owned = tables.tasks.get(&id).is_some_and(|task| task.user_id == owner);
        if owned {
            tables.tasks.remove(&id);
        }

        Ok(owned)
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, data: NewSession) -> Result<SessionRecord, StoreError> {
        let record = SessionRecord {
            id: data.id,
            user_id: data.user_id,
            token_hash: data.token_hash,
            created_at: Utc::now(),
            expires_at: data.expires_at,
        };
        self.tables.lock().sessions.push(record.clone());

        Ok(record)
    }

    async fn find_active_session(&self, token_hash: &str) -> Result<Option<SessionRecord>, StoreError> {
        let now = Utc::now();
        let tables = self.tables.lock();

        Ok(tables
            .sessions
            .iter()
            .find(|session| session.token_hash == token_hash && !session.is_expired_at(now))
            .cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock();
        let before = tables.sessions.len();
        tables.sessions.retain(|session| session.token_hash != token_hash);

        Ok(tables.sessions.len() < before)
    }

    async fn purge_expired_sessions(&self) -> Result<u64, StoreError> {
        let now = Utc::now();
        let mut tables = self.tables.lock();
        let before = tables.sessions.len();
        tables.sessions.retain(|session| !session.is_expired_at(now));

        Ok((before - tables.sessions.len()) as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
