//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use reqwest::{redirect, Client, Url};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::config::FetcherConfig;
use super::error::FetchError;
use super::traits::Fetcher;
use crate::metrics;

/// Streams inputs to disk over HTTP(S), following redirects.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder()
            .redirect(redirect::Policy::limited(config.max_redirects))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone());

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError> {
        debug!(url = %url, dest = %dest.display(), "Downloading input");

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Input download rejected");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|source| FetchError::Io {
                path: dest.to_path_buf(),
                source,
            })?;

        let mut written: u64 = 0;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::transport(url.as_str(), e))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|source| FetchError::Io {
                    path: dest.to_path_buf(),
                    source,
                })?;
            written += chunk.len() as u64;
        }

        file.flush().await.map_err(|source| FetchError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

        metrics::INPUT_BYTES_FETCHED.inc_by(written);
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::AliasMap;
    use axum::{http::StatusCode, response::Redirect, routing::get, Router};
    use tempfile::TempDir;

    const BODY: &[u8] = b"fake media payload";

    /// Serves a handful of fixture routes on an ephemeral port.
    async fn spawn_origin() -> String {
        let app = Router::new()
            .route("/media/a.mp4", get(|| async { BODY }))
            .route("/media/b.mov", get(|| async { "second input" }))
            .route("/moved", get(|| async { Redirect::temporary("/media/a.mp4") }))
            .route(
                "/broken.mp4",
                get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetcherConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_writes_body_to_disk() {
        let origin = spawn_origin().await;
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("in_a.mp4");

        let url = Url::parse(&format!("{}/media/a.mp4", origin)).unwrap();
        let written = fetcher().fetch(&url, &dest).await.unwrap();

        assert_eq!(written, BODY.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), BODY);
    }

    #[tokio::test]
    async fn test_fetch_follows_redirects() {
        let origin = spawn_origin().await;
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("in_moved.mp4");

        let url = Url::parse(&format!("{}/moved", origin)).unwrap();
        fetcher().fetch(&url, &dest).await.unwrap();
        assert_eq!(std::fs::read(&dest).unwrap(), BODY);
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let origin = spawn_origin().await;
        let temp = TempDir::new().unwrap();

        let url = Url::parse(&format!("{}/broken.mp4", origin)).unwrap();
        let err = fetcher()
            .fetch(&url, &temp.path().join("x.mp4"))
            .await
            .unwrap_err();

        match err {
            FetchError::Status { url: failed, status } => {
                assert_eq!(status, 500);
                assert!(failed.ends_with("/broken.mp4"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_transport_error() {
        // Bind and drop to get a port nobody listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let temp = TempDir::new().unwrap();
        let url = Url::parse(&format!("http://{}/a.mp4", addr)).unwrap();
        let err = fetcher()
            .fetch(&url, &temp.path().join("x.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_fetch_all_names_files_per_alias() {
        let origin = spawn_origin().await;
        let temp = TempDir::new().unwrap();

        let mut inputs = AliasMap::new();
        inputs.insert("main".to_string(), format!("{}/media/a.mp4?sig=1", origin));
        inputs.insert("overlay".to_string(), format!("{}/media/b.mov", origin));

        let paths = fetcher().fetch_all(&inputs, temp.path()).await.unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(paths["main"], temp.path().join("main_a.mp4"));
        assert_eq!(paths["overlay"], temp.path().join("overlay_b.mov"));
        assert_eq!(std::fs::read(&paths["main"]).unwrap(), BODY);
        assert_eq!(
            std::fs::read_to_string(&paths["overlay"]).unwrap(),
            "second input"
        );
    }

    #[tokio::test]
    async fn test_fetch_all_fails_if_any_input_fails() {
        let origin = spawn_origin().await;
        let temp = TempDir::new().unwrap();

        let mut inputs = AliasMap::new();
        inputs.insert("good".to_string(), format!("{}/media/a.mp4", origin));
        inputs.insert("bad".to_string(), format!("{}/broken.mp4", origin));

        let err = fetcher().fetch_all(&inputs, temp.path()).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_fetch_all_rejects_unparseable_url() {
        let temp = TempDir::new().unwrap();
        let mut inputs = AliasMap::new();
        inputs.insert("in".to_string(), "not a url".to_string());

        let err = fetcher().fetch_all(&inputs, temp.path()).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
