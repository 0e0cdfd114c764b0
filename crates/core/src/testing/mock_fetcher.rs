//! Mock fetcher for testing.

use async_trait::async_trait;
use reqwest::Url;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, Fetcher};

/// Mock implementation of the Fetcher trait.
///
/// Writes canned bytes instead of downloading:
/// - Per-URL bodies, with a default for everything else
/// - Per-URL HTTP failure statuses
/// - Recording of every requested URL
///
/// # Example
///
/// ```rust,ignore
/// use ffjobs_core::testing::MockFetcher;
///
/// let fetcher = MockFetcher::new();
/// fetcher.fail_url("http://origin/missing.mp4", 404).await;
///
/// // ... run a job ...
///
/// assert_eq!(fetcher.fetched_urls().await.len(), 2);
/// ```
#[derive(Debug)]
pub struct MockFetcher {
    bodies: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    failures: Arc<RwLock<HashMap<String, u16>>>,
    fetched: Arc<RwLock<Vec<String>>>,
    default_body: Vec<u8>,
    delay_ms: Arc<RwLock<u64>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            bodies: Arc::new(RwLock::new(HashMap::new())),
            failures: Arc::new(RwLock::new(HashMap::new())),
            fetched: Arc::new(RwLock::new(Vec::new())),
            default_body: b"mock media".to_vec(),
            delay_ms: Arc::new(RwLock::new(0)),
        }
    }

    /// Serve `body` for `url`.
    pub async fn set_body(&self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.bodies.write().await.insert(url.into(), body.into());
    }

    /// Answer `url` with an HTTP error status.
    pub async fn fail_url(&self, url: impl Into<String>, status: u16) {
        self.failures.write().await.insert(url.into(), status);
    }

    /// Delay every fetch, to keep jobs in flight.
    pub async fn set_delay_ms(&self, delay_ms: u64) {
        *self.delay_ms.write().await = delay_ms;
    }

    /// URLs requested so far, in request order.
    pub async fn fetched_urls(&self) -> Vec<String> {
        self.fetched.read().await.clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError> {
        let key = url.to_string();
        self.fetched.write().await.push(key.clone());

        let delay = *self.delay_ms.read().await;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if let Some(status) = self.failures.read().await.get(&key) {
            return Err(FetchError::Status {
                url: key,
                status: *status,
            });
        }

        let body = self
            .bodies
            .read()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.default_body.clone());

        tokio::fs::write(dest, &body)
            .await
            .map_err(|source| FetchError::Io {
                path: dest.to_path_buf(),
                source,
            })?;

        Ok(body.len() as u64)
    }
}
