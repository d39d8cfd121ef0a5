/// Landing page
///
/// ```text
/// GET /
/// ```

use axum::{extract::State, http::HeaderMap, response::Response};
use serde::Serialize;

use super::page;
use crate::{
    app::AppState,
    cookies,
    error::ApiResult,
    session::{require_user, Access, CurrentSession},
};

/// Home page view
#[derive(Debug, Serialize)]
pub struct HomeView {
    /// Whether the visitor is signed in
    pub authenticated: bool,

    /// Display name of the signed-in user
    pub name: Option<String>,

    pub flash: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let name = match require_user(&state, &session).await? {
        Access::Allow(user) => Some(user.name),
        Access::Deny => None,
    };
    let flash = cookies::read_flash(&headers);
    let flash_shown = flash.is_some();

    Ok(page(
        HomeView {
            authenticated: name.is_some(),
            name,
            flash,
        },
        flash_shown,
    ))
}
