/// Session manager
///
/// Establishes, resolves and destroys server-side sessions. The request
/// layer hands over the raw cookie value and gets back a typed
/// [`SessionState`]; it never sees token hashes or session rows.
///
/// # State Machine
///
/// ```text
/// Anonymous --(sign-in success)--> Authenticated
/// Authenticated --(logout | expiry)--> Anonymous
/// ```
///
/// A cookie that is missing, malformed, badly signed, unknown or expired
/// resolves to `Anonymous`. Resolution never fails because of client input;
/// only a store fault is an error.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;
use uuid::Uuid;

use super::{token, Principal};
use crate::models::{session::NewSession, user::UserId};
use crate::store::{SessionStore, StoreError};

/// Typed session of one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No user bound
    #[default]
    Anonymous,

    /// Bound to a user by a live session row
    Authenticated { user_id: UserId, session_id: Uuid },
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    /// The bound user, if any
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated { user_id, .. } => Some(*user_id),
        }
    }
}

/// A freshly created session
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Signed value for the session cookie
    pub cookie_value: String,

    pub session_id: Uuid,

    pub expires_at: DateTime<Utc>,
}

/// Creates and checks sessions
///
/// Holds the signing secret and the session lifetime. Cheap to clone.
#[derive(Clone)]
pub struct SessionManager {
    secret: String,
    ttl: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Starts a session for `principal`
    ///
    /// Expired sessions of all users are purged first so the table does not
    /// grow without bound.
    pub async fn establish<S, P>(&self, store: &S, principal: &P) -> Result<IssuedSession, StoreError>
    where
        S: SessionStore + ?Sized,
        P: Principal + ?Sized,
    {
        let purged = store.purge_expired_sessions().await?;
        if purged > 0 {
            debug!(purged, "Purged expired sessions");
        }

        let token = token::generate_token();
        let record = store
            .insert_session(NewSession {
                id: Uuid::new_v4(),
                user_id: principal.principal_id(),
                token_hash: token::hash_token(&token),
                expires_at: Utc::now() + self.ttl,
            })
            .await?;

        debug!(user_id = record.user_id, session_id = %record.id, "Session established");

        Ok(IssuedSession {
            cookie_value: token::sign(&token, &self.secret),
            session_id: record.id,
            expires_at: record.expires_at,
        })
    }

    /// Maps a cookie value to the session it names
    pub async fn resolve<S>(&self, store: &S, cookie: Option<&str>) -> Result<SessionState, StoreError>
    where
        S: SessionStore + ?Sized,
    {
        let Some(value) = cookie else {
            return Ok(SessionState::Anonymous);
        };

        let Some(token) = token::verify(value, &self.secret) else {
            debug!("Rejected session cookie with invalid signature");
            return Ok(SessionState::Anonymous);
        };

        Ok(match store.find_active_session(&token::hash_token(token)).await? {
            Some(record) => SessionState::Authenticated {
                user_id: record.user_id,
                session_id: record.id,
            },
            None => SessionState::Anonymous,
        })
    }

    /// Ends the session named by `cookie`
    ///
    /// Succeeds even when there is nothing to end.
    pub async fn destroy<S>(&self, store: &S, cookie: Option<&str>) -> Result<(), StoreError>
    where
        S: SessionStore + ?Sized,
    {
        let Some(token) = cookie.and_then(|value| token::verify(value, &self.secret)) else {
            return Ok(());
        };

        if store.delete_session(&token::hash_token(token)).await? {
            debug!("Session destroyed");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{CreateUserOutcome, NewUser, User};
    use crate::store::{MemoryStore, UserStore};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn manager() -> SessionManager {
        SessionManager::new(SECRET, Duration::hours(1))
    }

    async fn user(store: &MemoryStore) -> User {
        let outcome = store
            .create_user(NewUser {
                name: "Ada".to_string(),
                email: "ada@x.com".to_string(),
                password_hash: "$argon2id$stub".to_string(),
            })
            .await
            .unwrap();

        match outcome {
            CreateUserOutcome::Created(user) => user,
            CreateUserOutcome::AlreadyExists => unreachable!(),
        }
    }

    #[test]
    fn test_session_state_accessors() {
        let anonymous = SessionState::default();
        assert!(!anonymous.is_authenticated());
        assert_eq!(anonymous.user_id(), None);

        let authenticated = SessionState::Authenticated {
            user_id: 9,
            session_id: Uuid::new_v4(),
        };
        assert!(authenticated.is_authenticated());
        assert_eq!(authenticated.user_id(), Some(9));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", manager());
        assert!(!debug.contains(SECRET));
    }

    #[tokio::test]
    async fn test_establish_then_resolve() {
        let store = MemoryStore::new();
        let ada = user(&store).await;
        let manager = manager();

        let issued = manager.establish(&store, &ada).await.unwrap();
        let state = manager.resolve(&store, Some(&issued.cookie_value)).await.unwrap();

        assert_eq!(
            state,
            SessionState::Authenticated {
                user_id: ada.id,
                session_id: issued.session_id,
            }
        );
        assert!(issued.expires_at > Utc::now());
    }

    #[tokio::test]
    async fn test_missing_or_forged_cookie_is_anonymous() {
        let store = MemoryStore::new();
        let ada = user(&store).await;
        let manager = manager();
        manager.establish(&store, &ada).await.unwrap();

        assert_eq!(manager.resolve(&store, None).await.unwrap(), SessionState::Anonymous);
        assert_eq!(
            manager.resolve(&store, Some("garbage")).await.unwrap(),
            SessionState::Anonymous
        );

        let unknown = token::sign(&token::generate_token(), SECRET);
        assert_eq!(
            manager.resolve(&store, Some(&unknown)).await.unwrap(),
            SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_cookie_from_other_secret_is_anonymous() {
        let store = MemoryStore::new();
        let ada = user(&store).await;

        let other = SessionManager::new("another-secret-key-at-least-32-bytes", Duration::hours(1));
        let issued = other.establish(&store, &ada).await.unwrap();

        assert_eq!(
            manager().resolve(&store, Some(&issued.cookie_value)).await.unwrap(),
            SessionState::Anonymous
        );
    }

    #[tokio::test]
    async fn test_destroy_ends_session() {
        let store = MemoryStore::new();
        let ada = user(&store).await;
        let manager = manager();

        let issued = manager.establish(&store, &ada).await.unwrap();
        manager.destroy(&store, Some(&issued.cookie_value)).await.unwrap();

        assert_eq!(
            manager.resolve(&store, Some(&issued.cookie_value)).await.unwrap(),
            SessionState::Anonymous
        );

        // Nothing left to destroy
        manager.destroy(&store, Some(&issued.cookie_value)).await.unwrap();
        manager.destroy(&store, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_session_is_anonymous_and_purged() {
        let store = MemoryStore::new();
        let ada = user(&store).await;

        let expired = SessionManager::new(SECRET, Duration::seconds(-1));
        let issued = expired.establish(&store, &ada).await.unwrap();

        assert_eq!(
            manager().resolve(&store, Some(&issued.cookie_value)).await.unwrap(),
            SessionState::Anonymous
        );

        manager().establish(&store, &ada).await.unwrap();
        assert_eq!(store.session_count(), 1);
    }
}
