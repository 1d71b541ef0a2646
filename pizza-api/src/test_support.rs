use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use diesel::sqlite::SqliteConnection;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use crate::handlers::{router, AppState};
use crate::{establish_connection, run_migrations};

/// Router over a freshly migrated database file that lives as long as the value.
pub struct TestApp {
    _dir: TempDir,
    database_url: String,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let database_url = dir.path().join("test.db").to_str().unwrap().to_string();
        run_migrations(&mut establish_connection(&database_url).unwrap()).unwrap();

        Self {
            router: router(AppState::new(database_url.clone())),
            database_url,
            _dir: dir,
        }
    }

    pub fn connect(&self) -> SqliteConnection {
        establish_connection(&self.database_url).unwrap()
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
        send(self.router(), method, uri, body).await
    }

    /// Like [`TestApp::send`] but decodes the body, `Value::Null` when empty.
    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(method, uri, body).await;
        if bytes.is_empty() {
            return (status, Value::Null);
        }
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

/// Sends one request through `router`; usable from spawned tasks.
pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}
