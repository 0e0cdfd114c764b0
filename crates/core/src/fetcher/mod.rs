//! Fetcher module for acquiring job inputs.
//!
//! Inputs are declared as `alias -> URL`. Each one is downloaded into the
//! job's staging directory under a name derived from the alias and the URL
//! basename, and all downloads of a job run concurrently.
//!
//! # Example
//!
//! ```ignore
//! use ffjobs_core::fetcher::{Fetcher, FetcherConfig, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new(&FetcherConfig::default())?;
//! let paths = fetcher.fetch_all(&request.input_files, &workspace.staging_dir).await?;
//! println!("input 'in' stored at {}", paths["in"].display());
//! ```

mod config;
mod error;
mod http;
mod naming;
mod traits;

pub use config::FetcherConfig;
pub use error::FetchError;
pub use http::HttpFetcher;
pub use naming::{local_file_name, DEFAULT_EXTENSION, RECOGNIZED_EXTENSIONS};
pub use traits::{Fetcher, InputPaths};
