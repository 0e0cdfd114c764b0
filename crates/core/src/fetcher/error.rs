//! Error types for the fetcher module.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be parsed.
    #[error("Invalid input URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The server answered with a non-success status.
    #[error("Failed to download {url}: status {status}")]
    Status { url: String, status: u16 },

    /// Connection, TLS, redirect or body streaming failure.
    #[error("Failed to download {url}: {cause}")]
    Transport { url: String, cause: String },

    /// Writing the downloaded body to disk failed.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be built.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    pub fn transport(url: impl Into<String>, cause: impl ToString) -> Self {
        Self::Transport {
            url: url.into(),
            cause: cause.to_string(),
        }
    }

    /// URL the error relates to, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::InvalidUrl { url, .. } | Self::Status { url, .. } | Self::Transport { url, .. } => {
                Some(url)
            }
            Self::Io { .. } | Self::Client(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_mentions_url_and_code() {
        let err = FetchError::Status {
            url: "https://example.com/a.mp4".to_string(),
            status: 500,
        };
        let message = err.to_string();
        assert!(message.contains("https://example.com/a.mp4"));
        assert!(message.contains("500"));
        assert_eq!(err.url(), Some("https://example.com/a.mp4"));
    }
}
