//! Configuration for the HTTP fetcher.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// TCP connect timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout in seconds. Unset means no limit, since inputs
    /// may be arbitrarily large.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Maximum number of redirects followed per download.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// User-Agent header sent with every download.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

fn default_user_agent() -> String {
    format!("ffjobs/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            timeout_secs: None,
            max_redirects: default_max_redirects(),
            user_agent: default_user_agent(),
        }
    }
}
