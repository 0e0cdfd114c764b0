//! Trait definitions for the fetcher module.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::Url;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::FetchError;
use super::naming::local_file_name;
use crate::job::AliasMap;

/// Alias -> absolute path of the fetched input.
pub type InputPaths = BTreeMap<String, PathBuf>;

/// Retrieves remote inputs onto local disk.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Returns the name of this fetcher implementation.
    fn name(&self) -> &str;

    /// Downloads `url` into `dest`, returning the number of bytes written.
    async fn fetch(&self, url: &Url, dest: &Path) -> Result<u64, FetchError>;

    /// Downloads every input into `staging_dir` concurrently.
    ///
    /// The first failure fails the whole set; files already written are left
    /// in place.
    async fn fetch_all(
        &self,
        inputs: &AliasMap,
        staging_dir: &Path,
    ) -> Result<InputPaths, FetchError> {
        let mut planned = Vec::with_capacity(inputs.len());
        for (alias, raw_url) in inputs {
            let url = Url::parse(raw_url).map_err(|e| FetchError::InvalidUrl {
                url: raw_url.clone(),
                reason: e.to_string(),
            })?;
            let dest = staging_dir.join(local_file_name(alias, &url));
            planned.push((alias.clone(), url, dest));
        }

        let downloads = planned.iter().map(|(alias, url, dest)| async move {
            let bytes = self.fetch(url, dest).await?;
            debug!(alias = %alias, url = %url, bytes, "Input fetched");
            Ok::<_, FetchError>(())
        });
        try_join_all(downloads).await?;

        Ok(planned
            .into_iter()
            .map(|(alias, _, dest)| (alias, dest))
            .collect())
    }
}
