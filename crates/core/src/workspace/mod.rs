//! Per-job filesystem sandboxes.
//!
//! Every job owns two directories derived from its id: a staging directory
//! receiving the fetched inputs and an output directory receiving the files
//! the external process writes. Directories outlive the job so that the
//! download endpoint can serve the outputs.

mod config;
mod error;
mod manager;

pub use config::WorkspaceConfig;
pub use error::WorkspaceError;
pub use manager::{is_plain_file_name, Workspace, WorkspaceManager};
