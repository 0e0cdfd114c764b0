//! Types for process execution results.

use std::borrow::Cow;

/// Outcome of a process that was started and ran to exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    /// Exit code; `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Set when stdout exceeded the capture limit.
    pub stdout_truncated: bool,
    /// Set when stderr exceeded the capture limit.
    pub stderr_truncated: bool,
    pub duration_ms: u64,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    pub fn stdout_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    pub fn stderr_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    /// Message describing a failed run: the diagnostic stream if any,
    /// otherwise the exit status.
    pub fn failure_message(&self) -> String {
        let stderr = self.stderr_text();
        if !stderr.is_empty() {
            return stderr.into_owned();
        }
        match self.exit_code {
            Some(code) => format!("Process exited with code {}", code),
            None => "Process terminated by signal".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_requires_zero_exit() {
        let mut result = ProcessResult {
            exit_code: Some(0),
            ..Default::default()
        };
        assert!(result.success());
        result.exit_code = Some(1);
        assert!(!result.success());
        result.exit_code = None;
        assert!(!result.success());
    }

    #[test]
    fn test_failure_message_prefers_stderr() {
        let result = ProcessResult {
            exit_code: Some(1),
            stderr: b"Invalid data found when processing input\n".to_vec(),
            ..Default::default()
        };
        assert_eq!(
            result.failure_message(),
            "Invalid data found when processing input\n"
        );
    }

    #[test]
    fn test_failure_message_without_stderr() {
        let result = ProcessResult {
            exit_code: Some(2),
            ..Default::default()
        };
        assert_eq!(result.failure_message(), "Process exited with code 2");

        let killed = ProcessResult::default();
        assert_eq!(killed.failure_message(), "Process terminated by signal");
    }
}
