/// Task model and database operations
///
/// Every query here filters on `user_id` as well as `id`. A task that exists
/// but belongs to someone else is indistinguishable from a missing one.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(100) NOT NULL,
///     complete BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use super::user::UserId;

/// Numeric task identifier
pub type TaskId = i64;

/// A to-do item owned by exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: TaskId,

    /// Owning user
    #[serde(skip_serializing)]
    pub user_id: UserId,

    /// Trimmed, non-empty title
    pub title: String,

    /// Completion flag
    pub complete: bool,

    /// When the task was added
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Inserts an incomplete task for `owner`
    pub async fn create(pool: &PgPool, owner: UserId, title: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title)
            VALUES ($1, $2)
            RETURNING id, user_id, title, complete, created_at
            "#,
        )
        .bind(owner)
        .bind(title)
        .fetch_one(pool)
        .await
    }

    /// Lists the tasks of `owner` in insertion order
    pub async fn list_by_owner(pool: &PgPool, owner: UserId) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, complete, created_at
            FROM tasks
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await
    }

    /// Flips `complete` in a single statement
    ///
    /// Returns `None` when no task with this ID belongs to `owner`.
    pub async fn toggle_complete(
        pool: &PgPool,
        owner: UserId,
        id: TaskId,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET complete = NOT complete
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, complete, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await
    }

    /// Deletes a task owned by `owner`
    ///
    /// Returns false when nothing matched.
    pub async fn delete(pool: &PgPool, owner: UserId, id: TaskId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
