//! Common test utilities for API integration tests
//!
//! Builds the real router over a `MemoryStore`, so the tests need no
//! database. Helpers cover form posts, cookies and JSON bodies.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use std::sync::Arc;
use ticklist_api::{
    app::{build_router, AppState},
    config::Config,
};
use ticklist_shared::{auth::session::SessionManager, store::MemoryStore};
use tower::Service as _;

pub const SECRET: &str = "test-secret-key-at-least-32-bytes-long";
pub const PASSWORD: &str = "abc123!!";

/// Test context containing the router and its store
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub app: Router,
    pub config: Config,
}

impl TestContext {
    pub fn new() -> Self {
        Self::build(|_| {})
    }

    /// Context whose sessions live for `ttl`
    pub fn with_session_ttl(ttl: chrono::Duration) -> Self {
        Self::build(|state| state.sessions = SessionManager::new(SECRET, ttl))
    }

    fn build(customize: impl FnOnce(&mut AppState)) -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgresql://unused/ticklist".to_string()),
            "SECRET_KEY" => Some(SECRET.to_string()),
            _ => None,
        })
        .expect("test configuration is valid");

        let store = Arc::new(MemoryStore::new());
        let mut state = AppState::new(store.clone(), config.clone());
        customize(&mut state);

        TestContext {
            store,
            app: build_router(state),
            config,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().call(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> Response<Body> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    /// POST with an arbitrary body and optional content type
    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap()).await
    }

    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Response<Body> {
        self.post_form(
            "/sign-up",
            &[
                ("name", name),
                ("email", email),
                ("password", password),
                ("confirm", password),
            ],
            None,
        )
        .await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Response<Body> {
        self.post_form("/sign-in", &[("email", email), ("password", password)], None)
            .await
    }

    /// Registers an account and returns the `name=value` session cookie
    pub async fn signed_in_user(&self, name: &str, email: &str) -> String {
        let response = self.sign_up(name, email, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = self.sign_in(email, PASSWORD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        set_cookie(&response, "ticklist_session").expect("sign-in sets a session cookie")
    }
}

/// `name=value` of the first `Set-Cookie` header for `name`
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", name)))
        .and_then(|value| value.split(';').next())
        .map(str::to_string)
}

/// Full `Set-Cookie` header for `name`, attributes included
pub fn set_cookie_header(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{}=", name)))
        .map(str::to_string)
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
