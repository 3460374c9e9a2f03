#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use threesixty_api::auth::jwt::{encode_token, Claims, JwtConfig, UserMetadata};
use threesixty_api::auth::JwtIdentityProvider;
use threesixty_api::config::ServerConfig;
use threesixty_api::router::build_app_router;
use threesixty_api::state::AppState;
use threesixty_db::InMemoryStore;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        app_origin: "http://localhost:5173".parse().unwrap(),
        database_url: None,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            issuer: None,
        },
    }
}

/// Build the full application router on an in-memory store.
///
/// Uses the same [`build_app_router`] as `main.rs`, so the middleware stack
/// matches production. The store is returned for direct inspection.
pub fn build_test_app() -> (Router, Arc<InMemoryStore>) {
    let config = test_config();
    let store = Arc::new(InMemoryStore::new());
    let identity = Arc::new(JwtIdentityProvider::new(config.jwt.clone()));
    let state = AppState::new(config.clone(), store.clone(), store.clone(), identity);
    (build_app_router(state, &config), store)
}

/// Signed session token for `sub` with the given attributes.
pub fn token_for(sub: &str, metadata: UserMetadata) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        exp: now + 3600,
        iat: now,
        iss: None,
        email: Some(format!("{sub}@example.com")),
        metadata,
    };
    let config = test_config();
    encode_token(&claims, &config.jwt).unwrap()
}

/// Token for an onboarded homeowner.
pub fn homeowner_token(sub: &str) -> String {
    token_for(
        sub,
        UserMetadata {
            onboarding_completed: true,
            ..Default::default()
        },
    )
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, body, None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::POST, uri, body, Some(token)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, body, None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    json_request(app, Method::PUT, uri, body, Some(token)).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
