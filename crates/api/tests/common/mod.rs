//! Shared helpers for HTTP integration tests.
//!
//! Requests go straight into the router via `tower::ServiceExt::oneshot`,
//! without a TCP listener.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use songbook_api::auth::jwt::{generate_access_token, JwtConfig};
use songbook_api::config::ServerConfig;
use songbook_api::router::build_app_router;
use songbook_api::state::AppState;
use songbook_core::permissions::ALL_PERMISSIONS;
use songbook_core::types::DbId;
use songbook_db::models::user::CreateUser;
use songbook_db::repositories::{PermissionRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "songbook-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the application router exactly as `main.rs` does.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// A seeded user and a valid bearer token for them.
pub struct TestUser {
    pub id: DbId,
    pub username: String,
    pub token: String,
}

/// Create a user holding exactly `permissions`.
pub async fn create_user(pool: &PgPool, username: &str, permissions: &[&str]) -> TestUser {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: format!("{username} test"),
            username: username.to_string(),
            email: format!("{username}@example.com"),
        },
    )
    .await
    .unwrap();
    PermissionRepo::grant(pool, user.id, permissions).await.unwrap();

    let token = generate_access_token(user.id, &test_config().jwt).unwrap();
    TestUser {
        id: user.id,
        username: user.username,
        token,
    }
}

/// Create a user holding every permission.
pub async fn create_admin(pool: &PgPool, username: &str) -> TestUser {
    create_user(pool, username, ALL_PERMISSIONS).await
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None, &[]).await
}

pub async fn post_json(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body), &[]).await
}

pub async fn patch_json(app: &Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body), &[]).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None, &[]).await
}

/// Read the full response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
