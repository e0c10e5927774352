//! Common test utilities for in-process server testing.
//!
//! Provides a fixture that builds the full router against a temporary
//! SQLite database, with the classifier replaced by a scriptable mock.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use analyst_core::testing::MockClassifier;
use analyst_core::{
    AnalysisOrchestrator, ClassifierBackend, ClassifierConfig, Config, DatabaseConfig,
    ServerConfig, SqliteTicketStore, TicketClassifier, TicketStore,
};

/// Test fixture holding the router and the injected mock classifier.
pub struct TestFixture {
    pub router: Router,
    pub classifier: Arc<MockClassifier>,
    /// Keeps the test database alive for the fixture's lifetime
    #[allow(dead_code)]
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            classifier: ClassifierConfig {
                backend: ClassifierBackend::Keyword,
                llm: None,
            },
            server: ServerConfig {
                host: IpAddr::V4(Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
        };

        let store: Arc<dyn TicketStore> = Arc::new(
            SqliteTicketStore::new(&db_path).expect("Failed to create ticket store"),
        );

        let classifier = Arc::new(MockClassifier::new());
        let orchestrator = AnalysisOrchestrator::new(
            Arc::clone(&store),
            Arc::clone(&classifier) as Arc<dyn TicketClassifier>,
        );

        let state = Arc::new(analyst_server::state::AppState::new(
            config,
            store,
            orchestrator,
        ));
        let router = analyst_server::api::create_router(state);

        Self {
            router,
            classifier,
            temp_dir,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with no body.
    pub async fn post_empty(&self, path: &str) -> TestResponse {
        self.request("POST", path, None).await
    }

    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
