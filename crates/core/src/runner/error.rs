//! Error types for the process runner.

use thiserror::Error;

/// The external process could not be started or awaited.
///
/// A process that starts and exits non-zero is not an error here.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Process could not be launched: empty command")]
    EmptyCommand,

    #[error("Process could not be launched: executable '{program}' not found")]
    NotFound { program: String },

    #[error("Process could not be launched: '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for process '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub(crate) fn spawn(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                program: program.to_string(),
            }
        } else {
            Self::Spawn {
                program: program.to_string(),
                source,
            }
        }
    }
}
