//! Testing utilities and mock implementations.
//!
//! The mocks stand in for the components that touch the network or spawn
//! processes, so the orchestrator can be exercised end to end in-process.
//!
//! # Example
//!
//! ```rust,ignore
//! use ffjobs_core::testing::{MockFetcher, MockProcessRunner};
//!
//! let fetcher = Arc::new(MockFetcher::new());
//! let runner = Arc::new(MockProcessRunner::new());
//! runner.set_exit(1, "Invalid data found when processing input").await;
//!
//! // Build a JobOrchestrator with them...
//! ```

mod mock_fetcher;
mod mock_process_runner;

pub use mock_fetcher::MockFetcher;
pub use mock_process_runner::MockProcessRunner;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::job::JobRequest;

    /// A single-input, single-output transcode request.
    pub fn transcode_request(input_url: &str, output_filename: &str) -> JobRequest {
        JobRequest::new("ffmpeg -i {{in}} -c:v libx264 {{out}}")
            .with_input("in", input_url)
            .with_output("out", output_filename)
    }

    /// A two-input request joining `a` and `b` into one output.
    pub fn merge_request(a_url: &str, b_url: &str, output_filename: &str) -> JobRequest {
        JobRequest::new(
            "ffmpeg -i {{a}} -i {{ b }} -filter_complex \"[0:v][1:v]concat=n=2:v=1\" {{out}}",
        )
        .with_input("a", a_url)
        .with_input("b", b_url)
        .with_output("out", output_filename)
    }
}
