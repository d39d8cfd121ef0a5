/// Route handlers
///
/// Page handlers return the JSON view model a template would render.
///
/// - `home`: Landing page
/// - `health`: Health check endpoint
/// - `auth`: Sign-up, sign-in and logout
/// - `tasks`: The signed-in user's task list

pub mod auth;
pub mod health;
pub mod home;
pub mod tasks;

use axum::{
    http::header,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};

/// 303 redirect that also sets the given cookies
pub(crate) fn redirect_with_cookies(location: &str, cookies: Vec<String>) -> Response {
    let set_cookies = AppendHeaders(cookies.into_iter().map(|cookie| (header::SET_COOKIE, cookie)));
    (set_cookies, Redirect::to(location)).into_response()
}

/// JSON view that clears the flash cookie once it has been shown
pub(crate) fn page<T: serde::Serialize>(view: T, flash_shown: bool) -> Response {
    let clear_flash = flash_shown
        .then(|| (header::SET_COOKIE, crate::cookies::expire(crate::cookies::FLASH_COOKIE)));
    (AppendHeaders(clear_flash), axum::Json(view)).into_response()
}
