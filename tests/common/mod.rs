//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the full router (middleware included) with `oneshot`
//! requests against an in-memory collection store. `MockModel` stands in for
//! the Gemini endpoint so the advisor can be exercised without a network.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::response::Json;
use axum::Router;
use http_body_util::BodyExt;
use mintai::config::Config;
use mintai::server;
use mintai::services::Advisor;
use mintai::state::AppState;
use mintai::store::CollectionStore;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const TEST_API_KEY: &str = "test-key";

/// A response as the tests look at it.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Value of the degraded-content header, if set.
    pub fn degraded(&self) -> Option<&str> {
        self.headers
            .get(mintai::handlers::DEGRADED_HEADER)
            .and_then(|v| v.to_str().ok())
    }
}

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Template-only advisor, in-memory store.
    pub fn new() -> Self {
        Self::with_config(Config::local())
    }

    /// Advisor pointed at a mock model server.
    pub fn with_model(base_url: &str) -> Self {
        let mut config = Config::local();
        config.google_api_key = Some(TEST_API_KEY.into());
        config.gemini_base_url = base_url.into();
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let state = AppState::from_config(config).expect("Failed to build state");
        Self { state }
    }

    /// Template-only advisor over an explicit store.
    pub fn with_store(store: CollectionStore) -> Self {
        let state = AppState::new(Config::local(), store, Advisor::template_only());
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn router(&self) -> Router {
        server::router(self.state.clone())
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if body.is_some() {
            builder = builder.header("content-type", "application/json");
        }
        let request = builder
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.router().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(&body.to_string())).await
    }

    /// POST a body verbatim, for malformed-JSON cases.
    pub async fn post_raw(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(&body.to_string())).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }
}

/// A request the mock model received.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

/// Local HTTP server answering every request with a fixed status and body.
pub struct MockModel {
    pub base_url: String,
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

impl MockModel {
    pub async fn start(status: StatusCode, reply: Value) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = received.clone();

        let app = Router::new().fallback(
            move |headers: HeaderMap, request: Request<Body>| {
                let reply = reply.clone();
                let log = log.clone();
                async move {
                    let path = request.uri().path().to_string();
                    let bytes = request.into_body().collect().await.unwrap().to_bytes();
                    log.lock().unwrap().push(ReceivedRequest {
                        path,
                        api_key: headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(String::from),
                        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
                    });
                    (status, Json(reply))
                }
            },
        );

        let (port, _handle) = server::serve(app, "127.0.0.1", 0)
            .await
            .expect("Failed to start mock model");

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            received,
        }
    }

    /// A model that answers with `text` as its only candidate part.
    pub async fn replying(text: &str) -> Self {
        Self::start(StatusCode::OK, model_reply(text)).await
    }

    pub async fn failing(status: StatusCode) -> Self {
        Self::start(status, json!({ "error": { "message": "quota exceeded" } })).await
    }

    pub fn requests(&self) -> Vec<ReceivedRequest> {
        self.received.lock().unwrap().clone()
    }
}

pub fn model_reply(text: &str) -> Value {
    json!({
        "candidates": [
            { "content": { "role": "model", "parts": [ { "text": text } ] } }
        ]
    })
}

/// A summary whose template insights are fully predictable.
pub fn overspending_summary() -> Value {
    json!({
        "totalIncome": 1000,
        "totalExpenses": 1200,
        "topCategories": [
            { "name": "Rent", "amount": 600 },
            { "name": "Dining", "amount": 300 }
        ]
    })
}
