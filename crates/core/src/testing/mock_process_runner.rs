//! Mock process runner for testing.

use async_trait::async_trait;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::runner::{LaunchError, ProcessResult, ProcessRunner};

/// Mock implementation of the ProcessRunner trait.
///
/// Provides controllable behavior for testing:
/// - Records every argument vector it is asked to run
/// - Simulates exit codes and stderr output
/// - Simulates launch failures and panics
/// - Tracks the peak number of concurrent runs
///
/// On success it creates every absolute-path argument that does not exist
/// yet but whose parent directory does, standing in for the files a real
/// ffmpeg run would produce.
#[derive(Debug)]
pub struct MockProcessRunner {
    recorded: Arc<RwLock<Vec<Vec<String>>>>,
    exit_code: Arc<RwLock<i32>>,
    stderr: Arc<RwLock<Vec<u8>>>,
    launch_failure: Arc<RwLock<bool>>,
    panic_message: Arc<RwLock<Option<String>>>,
    delay_ms: Arc<RwLock<u64>>,
    output_contents: Vec<u8>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl Default for MockProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self {
            recorded: Arc::new(RwLock::new(Vec::new())),
            exit_code: Arc::new(RwLock::new(0)),
            stderr: Arc::new(RwLock::new(Vec::new())),
            launch_failure: Arc::new(RwLock::new(false)),
            panic_message: Arc::new(RwLock::new(None)),
            delay_ms: Arc::new(RwLock::new(0)),
            output_contents: b"mock output".to_vec(),
            running: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Exit with `code`, writing `stderr` to the diagnostic stream.
    pub async fn set_exit(&self, code: i32, stderr: impl Into<Vec<u8>>) {
        *self.exit_code.write().await = code;
        *self.stderr.write().await = stderr.into();
    }

    /// Fail every run as if the executable did not exist.
    pub async fn set_launch_failure(&self, fail: bool) {
        *self.launch_failure.write().await = fail;
    }

    /// Panic inside every run with `message`.
    pub async fn set_panic(&self, message: impl Into<String>) {
        *self.panic_message.write().await = Some(message.into());
    }

    /// Make every run take `delay_ms`.
    pub async fn set_delay_ms(&self, delay_ms: u64) {
        *self.delay_ms.write().await = delay_ms;
    }

    /// Argument vectors run so far.
    pub async fn recorded_runs(&self) -> Vec<Vec<String>> {
        self.recorded.read().await.clone()
    }

    /// Highest number of runs observed in progress at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn write_outputs(&self, args: &[String]) {
        for arg in args.iter().skip(1) {
            let path = Path::new(arg);
            let creatable = path.is_absolute()
                && !path.exists()
                && path.parent().map(Path::is_dir).unwrap_or(false);
            if creatable {
                let _ = tokio::fs::write(path, &self.output_contents).await;
            }
        }
    }
}

/// Decrements the running counter when a run ends.
struct Running<'a>(&'a AtomicUsize);

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, args: &[String]) -> Result<ProcessResult, LaunchError> {
        self.recorded.write().await.push(args.to_vec());

        let (program, _) = args.split_first().ok_or(LaunchError::EmptyCommand)?;
        if *self.launch_failure.read().await {
            return Err(LaunchError::NotFound {
                program: program.clone(),
            });
        }

        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let _running = Running(&self.running);

        let delay = *self.delay_ms.read().await;
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let panic_message = self.panic_message.read().await.clone();
        if let Some(message) = panic_message {
            panic!("{}", message);
        }

        let exit_code = *self.exit_code.read().await;
        if exit_code == 0 {
            self.write_outputs(args).await;
        }

        Ok(ProcessResult {
            exit_code: Some(exit_code),
            stdout: Vec::new(),
            stderr: self.stderr.read().await.clone(),
            stdout_truncated: false,
            stderr_truncated: false,
            duration_ms: delay,
        })
    }
}
