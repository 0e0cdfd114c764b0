//! Tokio-based process runner.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::debug;

use super::config::RunnerConfig;
use super::error::LaunchError;
use super::traits::ProcessRunner;
use super::types::ProcessResult;

/// Runs processes with `tokio::process`, capturing both streams concurrently.
pub struct TokioProcessRunner {
    config: RunnerConfig,
}

impl TokioProcessRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl Default for TokioProcessRunner {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Reads a stream to the end, keeping at most `cap` bytes.
///
/// Bytes past the cap are read and discarded so the child never blocks on a
/// full pipe.
async fn read_capped<R>(reader: Option<R>, cap: usize) -> std::io::Result<(Vec<u8>, bool)>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok((Vec::new(), false));
    };

    let mut kept = Vec::new();
    let mut truncated = false;
    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        let room = cap.saturating_sub(kept.len());
        if n > room {
            truncated = true;
        }
        kept.extend_from_slice(&buf[..n.min(room)]);
    }
    Ok((kept, truncated))
}

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    fn name(&self) -> &str {
        "tokio"
    }

    async fn run(&self, args: &[String]) -> Result<ProcessResult, LaunchError> {
        let (program, rest) = args.split_first().ok_or(LaunchError::EmptyCommand)?;
        let start = Instant::now();

        let mut child = Command::new(program)
            .args(rest)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LaunchError::spawn(program, e))?;

        debug!(program = %program, args = rest.len(), "Process started");

        let cap = self.config.max_captured_bytes;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            read_capped(stdout, cap),
            read_capped(stderr, cap)
        );

        let wait_err = |source| LaunchError::Wait {
            program: program.clone(),
            source,
        };
        let status = status.map_err(wait_err)?;
        let (stdout, stdout_truncated) = stdout.map_err(wait_err)?;
        let (stderr, stderr_truncated) = stderr.map_err(wait_err)?;

        let result = ProcessResult {
            exit_code: status.code(),
            stdout,
            stderr,
            stdout_truncated,
            stderr_truncated,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        debug!(
            program = %program,
            exit_code = ?result.exit_code,
            duration_ms = result.duration_ms,
            "Process exited"
        );

        Ok(result)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let runner = TokioProcessRunner::with_defaults();
        let result = runner.run(&args(&["echo", "hello"])).await.unwrap();

        assert!(result.success());
        assert_eq!(result.stdout_text(), "hello\n");
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_not_an_error() {
        let runner = TokioProcessRunner::with_defaults();
        let result = runner
            .run(&args(&["sh", "-c", "echo boom >&2; exit 3"]))
            .await
            .unwrap();

        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.stderr_text(), "boom\n");
        assert_eq!(result.failure_message(), "boom\n");
    }

    #[tokio::test]
    async fn test_missing_executable() {
        let runner = TokioProcessRunner::with_defaults();
        let err = runner
            .run(&args(&["ffjobs-definitely-not-installed"]))
            .await
            .unwrap_err();

        assert!(matches!(err, LaunchError::NotFound { .. }));
        assert!(err.to_string().contains("ffjobs-definitely-not-installed"));
    }

    #[tokio::test]
    async fn test_empty_command() {
        let runner = TokioProcessRunner::with_defaults();
        let err = runner.run(&[]).await.unwrap_err();
        assert!(matches!(err, LaunchError::EmptyCommand));
    }

    #[tokio::test]
    async fn test_output_is_capped() {
        let runner = TokioProcessRunner::new(RunnerConfig {
            max_captured_bytes: 16,
        });
        let result = runner
            .run(&args(&["sh", "-c", "head -c 100000 /dev/zero; echo tail >&2"]))
            .await
            .unwrap();

        assert!(result.success());
        assert_eq!(result.stdout.len(), 16);
        assert!(result.stdout_truncated);
        assert_eq!(result.stderr_text(), "tail\n");
        assert!(!result.stderr_truncated);
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        let runner = TokioProcessRunner::with_defaults();
        let result = runner
            .run(&args(&["echo", "$HOME; rm -rf /"]))
            .await
            .unwrap();
        assert_eq!(result.stdout_text(), "$HOME; rm -rf /\n");
    }
}
