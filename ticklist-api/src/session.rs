/// Request session extraction and the access guard
///
/// [`CurrentSession`] resolves the session cookie once per request.
/// Gated handlers then call [`require_user`] before doing anything else; a
/// `Deny` turns into a redirect to the sign-in page.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use ticklist_shared::{auth::session::SessionState, models::user::User};
use tracing::debug;

use crate::{app::AppState, cookies, error::ApiError};

/// Session state of the current request
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub SessionState);

#[async_trait]
impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let cookie = cookies::get(&parts.headers, cookies::SESSION_COOKIE);
        let session = state
            .sessions
            .resolve(state.store.as_ref(), cookie.as_deref())
            .await?;

        Ok(CurrentSession(session))
    }
}

/// Outcome of the access guard
#[derive(Debug)]
pub enum Access {
    /// The session belongs to an existing user
    Allow(User),

    /// Anonymous, or the user is gone
    Deny,
}

/// Loads the user bound to `session`
///
/// The user is re-read on every call so a deleted account loses access
/// immediately.
pub async fn require_user(state: &AppState, session: &SessionState) -> Result<Access, ApiError> {
    let Some(user_id) = session.user_id() else {
        return Ok(Access::Deny);
    };

    match state.store.find_user_by_id(user_id).await? {
        Some(user) => Ok(Access::Allow(user)),
        None => {
            debug!(user_id, "Session refers to a missing user");
            Ok(Access::Deny)
        }
    }
}

/// Response for a denied request
pub fn redirect_to_sign_in() -> Response {
    Redirect::to("/sign-in").into_response()
}
