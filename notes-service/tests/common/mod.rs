//! Common test utilities for notes-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use notes_service::config::NotesConfig;
use notes_service::services::{InMemoryNoteRepository, NoteRepository};
use notes_service::startup::{build_router, AppState, Application};
use serde_json::Value;
use std::sync::{Arc, Once};
use tower::ServiceExt;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,notes_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Router over a fresh in-memory store, plus a handle on that store.
pub fn memory_router() -> (Router, Arc<dyn NoteRepository>) {
    init_tracing();
    let repository: Arc<dyn NoteRepository> = Arc::new(InMemoryNoteRepository::new());
    let router = router_with(repository.clone());
    (router, repository)
}

pub fn router_with(repository: Arc<dyn NoteRepository>) -> Router {
    build_router(AppState {
        config: NotesConfig::in_memory(),
        repository,
    })
}

/// Send a request through the router and return status plus parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    send_request(router, request).await
}

pub async fn send_request(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

/// A running server bound to a random port.
pub struct TestApp {
    pub http_address: String,
    pub http_port: u16,
}

impl TestApp {
    pub async fn spawn() -> Self {
        init_tracing();

        let app = Application::build(NotesConfig::in_memory())
            .await
            .expect("Failed to build test application");

        let http_port = app.http_port();
        let http_address = format!("http://127.0.0.1:{}", http_port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", http_address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            http_address,
            http_port,
        }
    }
}
