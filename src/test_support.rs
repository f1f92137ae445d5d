//! Router wired to in-memory stores, for HTTP-level tests.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::app::build_router;
use crate::config::Config;
use crate::repos::memory::{MemoryCartStore, MemoryProducts, MemoryUsers};
use crate::services::auth::{Role, TokenService};
use crate::state::{AppState, Stores};

pub const TEST_SECRET: &str = "http-test-secret";

pub struct TestApp {
    router: Router,
    pub tokens: Arc<TokenService>,
    pub carts: Arc<MemoryCartStore>,
    pub products: Arc<MemoryProducts>,
}

impl TestApp {
    /// Catalog: 10 "Pineapple Tee" at 10.00, 11 "Canvas Tote" at 12.50.
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "DATABASE_URL" => Some("postgres://unused".to_string()),
            "JWT_SECRET" => Some(TEST_SECRET.to_string()),
            _ => None,
        })
        .expect("test config");

        let tokens = Arc::new(
            TokenService::new(&config.jwt_secret, config.access_token_ttl_seconds, 0)
                .expect("token service"),
        );
        let carts = Arc::new(MemoryCartStore::new());
        let products = Arc::new(MemoryProducts::with_products(&[
            (10, "Pineapple Tee", 10.0),
            (11, "Canvas Tote", 12.5),
        ]));

        let state = AppState::new(
            tokens.clone(),
            Stores {
                carts: carts.clone(),
                product_lookup: products.clone(),
                product_catalog: products.clone(),
                users: Arc::new(MemoryUsers::default()),
            },
        );

        Self {
            router: build_router(state, &config),
            tokens,
            carts,
            products,
        }
    }

    pub fn token(&self, user_id: i64, role: Role) -> String {
        self.tokens
            .issue(user_id, role)
            .expect("issue token")
            .access_token
    }

    pub async fn raw(&self, req: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(req)
            .await
            .expect("router is infallible")
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.raw(req).await;
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, body)
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request")
}
