//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the real application router (same middleware stack as production)
//! on top of a `#[sqlx::test]` pool and drives it with `tower::ServiceExt`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use orgst_api::auth::jwt::{generate_access_token, JwtConfig};
use orgst_api::auth::password::hash_password;
use orgst_api::config::ServerConfig;
use orgst_api::router::build_app_router;
use orgst_api::state::AppState;
use orgst_db::models::user::CreateUser;
use orgst_db::repositories::{RoleRepo, UserRepo};

/// Signing secret shared between the test app and minted tokens.
pub const TEST_JWT_SECRET: &str = "test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        mentor_role_keys: orgst_core::roles::DEFAULT_MENTOR_ROLE_KEYS
            .iter()
            .map(|s| s.to_string())
            .collect(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Mint a valid access token for a user id.
pub fn mint_token(user_id: i64) -> String {
    generate_access_token(user_id, &test_config().jwt).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// User fixtures
// ---------------------------------------------------------------------------

/// Create a user directly in the database and return `(user_id, password)`.
pub async fn create_test_user(pool: &PgPool, email: &str) -> (i64, String) {
    let password = "test_password_123!".to_string();
    let input = CreateUser {
        email: email.to_string(),
        display_name: email.split('@').next().unwrap_or("user").to_string(),
        password_hash: hash_password(&password).expect("hashing should succeed"),
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    (user.id, password)
}

/// Grant a seeded role (by key) to a user.
pub async fn grant_role(pool: &PgPool, user_id: i64, key: &str) {
    let roles = RoleRepo::find_by_keys(pool, &[key.to_string()])
        .await
        .expect("role lookup should succeed");
    let role = roles.first().expect("role key must be seeded");
    RoleRepo::assign(pool, user_id, role.id)
        .await
        .expect("role assignment should succeed");
}

/// Mark a user as staff.
pub async fn make_staff(pool: &PgPool, user_id: i64) {
    sqlx::query("UPDATE users SET is_staff = TRUE WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("staff update should succeed");
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request must build");

    app.oneshot(request).await.expect("request must complete")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, None, Some(token)).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(body), Some(token)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PATCH, uri, Some(body), Some(token)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(body), Some(token)).await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body must collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body must be valid JSON")
}
