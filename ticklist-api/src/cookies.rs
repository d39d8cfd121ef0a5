/// Session and flash cookies
///
/// Cookies are built and parsed by hand: the app only ever needs two of them,
/// both with fixed attributes.
///
/// - `ticklist_session`: signed session token, `HttpOnly`, `SameSite=Lax`
/// - `ticklist_flash`: one-shot message shown by the next page view

use axum::http::{header, HeaderMap};

pub const SESSION_COOKIE: &str = "ticklist_session";
pub const FLASH_COOKIE: &str = "ticklist_flash";

/// Value of the cookie `name` in the request headers
pub fn get(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// `Set-Cookie` value carrying a session
pub fn session(value: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, value, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that deletes `name` in the browser
pub fn expire(name: &str) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", name)
}

/// `Set-Cookie` value carrying a flash message
pub fn flash(message: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        FLASH_COOKIE,
        urlencoding::encode(message)
    )
}

/// Decoded flash message, if the request carries one
pub fn read_flash(headers: &HeaderMap) -> Option<String> {
    let raw = get(headers, FLASH_COOKIE)?;
    let message = urlencoding::decode(&raw).ok()?.into_owned();
    (!message.is_empty()).then_some(message)
}
