//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock fetcher and process runner injected, so the full job lifecycle
//! can be driven without network access or an ffmpeg binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use ffjobs_core::{
    testing::{MockFetcher, MockProcessRunner},
    CommandResolver, Config, DatabaseConfig, JobLedger, JobOrchestrator, OrchestratorConfig,
    ServerConfig, SqliteJobLedger, WorkspaceConfig, WorkspaceManager,
};

/// Re-export fixtures for test convenience
pub use ffjobs_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_submit() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.post("/v1/run-ffmpeg", json!({
///         "ffmpeg_command": "ffmpeg -i {{in}} {{out}}",
///         "input_files": { "in": "http://origin/a.mp4" },
///         "output_files": { "out": "result.mp4" }
///     })).await;
///
///     assert_eq!(response.status, StatusCode::OK);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock fetcher - configure input bodies and failures
    pub fetcher: Arc<MockFetcher>,
    /// Mock process runner - control exit codes and outputs
    pub runner: Arc<MockProcessRunner>,
    /// Ledger shared with the router
    pub ledger: Arc<dyn JobLedger>,
    /// Temporary directory for the database and workspaces
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub bytes: Vec<u8>,
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Fixed base URL for download links
    pub public_base_url: Option<String>,
    /// Admission limit
    pub max_concurrent_jobs: Option<usize>,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 8080, // Not used for in-process testing
                public_base_url: test_config.public_base_url,
            },
            database: DatabaseConfig {
                path: db_path.clone(),
            },
            workspace: WorkspaceConfig::with_roots(
                temp_dir.path().join("downloads"),
                temp_dir.path().join("outputs"),
            ),
            orchestrator: OrchestratorConfig {
                max_concurrent_jobs: test_config.max_concurrent_jobs,
            },
            ..Default::default()
        };

        let ledger: Arc<dyn JobLedger> =
            Arc::new(SqliteJobLedger::new(&db_path).expect("Failed to create job ledger"));
        let workspaces = Arc::new(
            WorkspaceManager::new(&config.workspace).expect("Failed to create workspace manager"),
        );
        let fetcher = Arc::new(MockFetcher::new());
        let runner = Arc::new(MockProcessRunner::new());

        let orchestrator = JobOrchestrator::new(
            &config.orchestrator,
            Arc::clone(&ledger),
            workspaces,
            Arc::clone(&fetcher) as Arc<dyn ffjobs_core::Fetcher>,
            Arc::new(CommandResolver::new(config.resolver.clone())),
            Arc::clone(&runner) as Arc<dyn ffjobs_core::ProcessRunner>,
        );

        let state = Arc::new(ffjobs_server::state::AppState::new(config, orchestrator));
        let router = ffjobs_server::api::create_router(state);

        Self {
            router,
            fetcher,
            runner,
            ledger,
            temp_dir,
        }
    }

    /// Directory holding a job's produced files.
    pub fn output_dir(&self, job_id: &str) -> PathBuf {
        self.temp_dir.path().join("outputs").join(job_id)
    }

    /// Directory holding a job's fetched inputs.
    pub fn staging_dir(&self, job_id: &str) -> PathBuf {
        self.temp_dir.path().join("downloads").join(job_id)
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None, &[]).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body), &[]).await
    }

    /// Send a POST request with JSON body and extra headers.
    pub async fn post_with_headers(
        &self,
        path: &str,
        body: Value,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        self.request("POST", path, Some(body), headers).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None, &[]).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Submit a job and return its id, asserting it was accepted.
    pub async fn submit(&self, body: Value) -> String {
        let response = self.post("/v1/run-ffmpeg", body).await;
        assert_eq!(
            response.status,
            StatusCode::OK,
            "submission rejected: {}",
            response.body
        );
        response.body["command_id"]
            .as_str()
            .expect("command_id missing")
            .to_string()
    }

    /// Poll the status endpoint until the job is terminal.
    pub async fn wait_for_terminal(&self, job_id: &str) -> Value {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        loop {
            let response = self.get(&format!("/v1/jobs/{}", job_id)).await;
            assert_eq!(response.status, StatusCode::OK);
            let status = response.body["status"].as_str().unwrap_or_default();
            if status == "completed" || status == "failed" {
                return response.body;
            }
            assert!(
                std::time::Instant::now() < deadline,
                "job {} stuck in {}",
                job_id,
                status
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Send a request to the test server.
    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
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

        TestResponse {
            status,
            headers,
            body,
            bytes: body_bytes.to_vec(),
        }
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

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
