/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(100) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE CHECK (email = lower(email)),
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Emails are normalized (trimmed, lower-cased) before they reach these
/// queries, which makes lookups case-insensitive without CITEXT.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::Principal;

/// Numeric user identifier
pub type UserId = i64;

/// A registered account
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: UserId,

    /// Display name
    pub name: String,

    /// Normalized (lower-case) email address
    pub email: String,

    /// Argon2id PHC string. Never plaintext.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl Principal for User {
    fn principal_id(&self) -> UserId {
        self.id
    }
}

/// Input for creating a user
///
/// `email` must already be normalized and `password_hash` must be a hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Result of inserting a user
#[derive(Debug, Clone)]
pub enum CreateUserOutcome {
    /// The row was inserted
    Created(User),

    /// Another account already uses this email
    AlreadyExists,
}

impl User {
    /// Inserts a user unless the email is taken
    ///
    /// Uses `ON CONFLICT DO NOTHING`, so two concurrent sign-ups with the same
    /// email resolve to one `Created` and one `AlreadyExists`.
    pub async fn create(pool: &PgPool, data: NewUser) -> Result<CreateUserOutcome, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO NOTHING
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_optional(pool)
        .await?;

        Ok(match user {
            Some(user) => CreateUserOutcome::Created(user),
            None => CreateUserOutcome::AlreadyExists,
        })
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by normalized email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }
}
