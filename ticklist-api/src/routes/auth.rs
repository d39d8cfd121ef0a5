/// Registration, sign-in and logout
///
/// # Endpoints
///
/// - `GET  /sign-up` - Sign-up page view
/// - `POST /sign-up` - Register; redirects to `/sign-in` with a flash message
/// - `GET  /sign-in` - Sign-in page view
/// - `POST /sign-in` - Start a session; redirects to `/tasks`
/// - `GET  /logout`  - End the session; redirects to `/`
///
/// Forms are `application/x-www-form-urlencoded`. Missing fields read as
/// empty and are reported by validation; any other body is a JSON 400.

use axum::{
    extract::{rejection::FormRejection, State},
    http::HeaderMap,
    response::Response,
    Form,
};
use serde::{Deserialize, Serialize};
use ticklist_shared::auth::credentials::{self, SignUp, SignUpOutcome};
use tracing::info;

use super::{page, redirect_with_cookies};
use crate::{
    app::AppState,
    cookies,
    error::ApiResult,
    session::CurrentSession,
};

pub const SIGNED_UP_MESSAGE: &str = "Account created. Please sign in.";
pub const ALREADY_REGISTERED_MESSAGE: &str =
    "You've already signed up with that email. Sign in instead.";

/// Sign-up and sign-in page view
#[derive(Debug, Serialize)]
pub struct AuthPageView {
    pub logged_in: bool,
    pub flash: Option<String>,
}

/// Sign-up form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
}

/// Sign-in form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

fn auth_page(session: CurrentSession, headers: &HeaderMap) -> Response {
    let flash = cookies::read_flash(headers);
    let flash_shown = flash.is_some();

    page(
        AuthPageView {
            logged_in: session.0.is_authenticated(),
            flash,
        },
        flash_shown,
    )
}

pub async fn sign_up_page(session: CurrentSession, headers: HeaderMap) -> Response {
    auth_page(session, &headers)
}

pub async fn sign_in_page(session: CurrentSession, headers: HeaderMap) -> Response {
    auth_page(session, &headers)
}

/// Registers an account
///
/// # Errors
///
/// - `400 Bad Request`: Body is not a urlencoded form
/// - `422 Unprocessable Entity`: Invalid fields or weak password
/// - `500 Internal Server Error`: Server error
pub async fn sign_up(
    State(state): State<AppState>,
    form: Result<Form<SignUpForm>, FormRejection>,
) -> ApiResult<Response> {
    let Form(form) = form?;
    let outcome = credentials::sign_up(
        state.store.as_ref(),
        SignUp {
            name: form.name,
            email: form.email,
            password: form.password,
            confirm: form.confirm,
        },
    )
    .await?;

    let message = match outcome {
        SignUpOutcome::Created(_) => SIGNED_UP_MESSAGE,
        SignUpOutcome::AlreadyRegistered => ALREADY_REGISTERED_MESSAGE,
    };

    Ok(redirect_with_cookies("/sign-in", vec![cookies::flash(message)]))
}

/// Checks credentials and starts a session
///
/// Any session the browser already holds is ended first.
///
/// # Errors
///
/// - `400 Bad Request`: Body is not a urlencoded form
/// - `401 Unauthorized`: Unknown email or wrong password (same message)
/// - `422 Unprocessable Entity`: Invalid fields
/// - `500 Internal Server Error`: Server error
pub async fn sign_in(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<SignInForm>, FormRejection>,
) -> ApiResult<Response> {
    let Form(form) = form?;
    let store = state.store.as_ref();
    let user = credentials::sign_in(store, &form.email, &form.password).await?;

    let previous = cookies::get(&headers, cookies::SESSION_COOKIE);
    state.sessions.destroy(store, previous.as_deref()).await?;

    let issued = state.sessions.establish(store, &user).await?;

    let cookie = cookies::session(
        &issued.cookie_value,
        state.sessions.ttl().num_seconds(),
        state.config.session.cookie_secure,
    );

    Ok(redirect_with_cookies("/tasks", vec![cookie]))
}

/// Ends the current session, if any
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let cookie = cookies::get(&headers, cookies::SESSION_COOKIE);
    state
        .sessions
        .destroy(state.store.as_ref(), cookie.as_deref())
        .await?;

    if cookie.is_some() {
        info!("User logged out");
    }

    Ok(redirect_with_cookies("/", vec![cookies::expire(cookies::SESSION_COOKIE)]))
}
