//! Error types for command resolution.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    /// Word splitting found an unterminated quote or a dangling escape.
    #[error("Malformed command template: unbalanced quoting in '{command}'")]
    UnbalancedQuotes { command: String },

    /// Nothing left to execute after resolution.
    #[error("Command template resolves to an empty command")]
    EmptyCommand,

    #[error("Output file for alias '{alias}' must be a plain file name, got '{filename}'")]
    InvalidOutputFilename { alias: String, filename: String },

    /// The concat strategy produces exactly one output.
    #[error("Concat jobs must declare exactly one output file, got {count}")]
    ConcatOutputs { count: usize },

    #[error("Concat jobs need at least one input file")]
    ConcatInputs,

    /// `input_order` disagrees with the declared inputs.
    #[error("Invalid input order: {reason}")]
    InputOrder { reason: String },

    /// The concat list file could not be written.
    #[error("Failed to write concat list {path}: {source}")]
    ListFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
