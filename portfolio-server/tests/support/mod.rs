//! Shared harness: the real router over an in-process store.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use portfolio_server::auth::{Auth, AuthSettings};
use portfolio_server::db::{ConnectionCache, StoreHandle, UriConnector};
use portfolio_server::{build_router, AppState, ServerConfig};
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let cache = ConnectionCache::new(
            UriConnector::new("portfolio_test", Duration::from_secs(1)),
            "memory://",
            None,
        );
        Self::with_cache(cache, &ServerConfig::default())
    }

    pub fn with_cache(cache: ConnectionCache, config: &ServerConfig) -> Self {
        let state = Arc::new(AppState::new(cache, AuthSettings::default()));
        let router = build_router(Arc::clone(&state), config);
        Self { router, state }
    }

    pub async fn store(&self) -> StoreHandle {
        self.state.db.connect().await.expect("memory store connects")
    }

    /// Create the admin account and return a `Cookie` header value for it
    pub async fn login_admin(&self) -> String {
        let store = self.store().await;
        Auth::new(store.as_ref(), &self.state.auth)
            .create_user(ADMIN_EMAIL, "Admin", ADMIN_PASSWORD)
            .await
            .expect("admin created");

        let response = self
            .send(
                Method::POST,
                "/api/auth/login",
                Some(serde_json::json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
                None,
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "login failed: {}", response.body);
        response.session_cookie().expect("login sets a session cookie")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();
        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.send(Method::POST, uri, Some(body), cookie).await
    }

    pub async fn put(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.send(Method::PUT, uri, Some(body), cookie).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::DELETE, uri, None, cookie).await
    }
}

impl TestResponse {
    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// `name=value` part of the session `Set-Cookie`, ready for a `Cookie` header
    pub fn session_cookie(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|c| c.split(';').next().map(str::to_string))
            .filter(|pair| !pair.ends_with('='))
    }

    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
