//! Shared harness for the HTTP integration tests.
//!
//! Requests go straight through the router with `tower::ServiceExt::oneshot`,
//! against an in-memory store and a mock mailer.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tower::ServiceExt;

use restbase::auth::crypto::hash_password;
use restbase::config::AppConfig;
use restbase::context::AppContext;
use restbase::mail::MockEmailSender;
use restbase::models::user::{User, USER_TABLE};
use restbase::resource::Resource;
use restbase::server::build_router;
use restbase::store::{MemoryStore, Store};

pub struct TestApp {
    pub router: Router,
    pub ctx: Arc<AppContext>,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<MockEmailSender>,
}

pub async fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(MockEmailSender::new());
    let ctx = Arc::new(AppContext::new(
        store.clone(),
        mailer.clone(),
        AppConfig::default(),
    ));
    TestApp {
        router: build_router(ctx.clone()),
        ctx,
        store,
        mailer,
    }
}

/// Basic-auth header value for email/password credentials
pub fn basic(username: &str, password: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", username, password))
    )
}

/// Basic-auth header value carrying an API key
pub fn key_auth(token: &str) -> String {
    basic(token, "api_key")
}

/// Fire one request and decode the JSON response
pub async fn request(
    router: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }

    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Insert a user directly into the store
pub async fn seed_user(
    app: &TestApp,
    name: &str,
    email: &str,
    password: &str,
    is_administrator: bool,
) -> User {
    let mut user = User {
        name: name.to_string(),
        email: email.to_string(),
        password_hash: hash_password(password).unwrap(),
        is_administrator,
        ..Default::default()
    };

    let doc = serde_json::to_value(&user).unwrap();
    let id = app.store.insert(USER_TABLE, &doc).await.unwrap();
    user.set_id(id);
    app.store
        .update(USER_TABLE, id, &serde_json::to_value(&user).unwrap())
        .await
        .unwrap();
    user
}
