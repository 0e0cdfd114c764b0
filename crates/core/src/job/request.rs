//! The client-submitted job request.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use super::types::AliasMap;
use crate::workspace::is_plain_file_name;

/// Structural problems detected at submission time.
///
/// A request failing validation is rejected before any ledger entry exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("Alias cannot be empty")]
    EmptyAlias,

    #[error("Output file for alias '{alias}' must be a plain file name, got '{filename}'")]
    InvalidOutputFilename { alias: String, filename: String },

    #[error("Output file name '{filename}' is declared by more than one alias")]
    DuplicateOutputFilename { filename: String },

    #[error("input_order references unknown input alias '{alias}'")]
    UnknownOrderAlias { alias: String },
}

/// A declarative media-processing request.
///
/// `ffmpeg_command` holds `{{alias}}` placeholders which are replaced by the
/// local paths of the fetched inputs and of the declared outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub ffmpeg_command: String,
    /// Alias -> URL to fetch.
    pub input_files: AliasMap,
    /// Alias -> output file name inside the job's output directory.
    pub output_files: AliasMap,
    /// Accepted for API compatibility, never called.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// Explicit input order for the concat strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_order: Option<Vec<String>>,
}

impl JobRequest {
    pub fn new(ffmpeg_command: impl Into<String>) -> Self {
        Self {
            ffmpeg_command: ffmpeg_command.into(),
            input_files: AliasMap::new(),
            output_files: AliasMap::new(),
            webhook_url: None,
            input_order: None,
        }
    }

    pub fn with_input(mut self, alias: impl Into<String>, url: impl Into<String>) -> Self {
        self.input_files.insert(alias.into(), url.into());
        self
    }

    pub fn with_output(mut self, alias: impl Into<String>, filename: impl Into<String>) -> Self {
        self.output_files.insert(alias.into(), filename.into());
        self
    }

    pub fn with_input_order(mut self, order: Vec<String>) -> Self {
        self.input_order = Some(order);
        self
    }

    /// Validates the request shape.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self
            .input_files
            .keys()
            .chain(self.output_files.keys())
            .any(|alias| alias.trim().is_empty())
        {
            return Err(RequestError::EmptyAlias);
        }

        let mut seen = HashSet::new();
        for (alias, filename) in &self.output_files {
            if !is_plain_file_name(filename) {
                return Err(RequestError::InvalidOutputFilename {
                    alias: alias.clone(),
                    filename: filename.clone(),
                });
            }
            if !seen.insert(filename.as_str()) {
                return Err(RequestError::DuplicateOutputFilename {
                    filename: filename.clone(),
                });
            }
        }

        if let Some(order) = &self.input_order {
            if let Some(alias) = order.iter().find(|a| !self.input_files.contains_key(*a)) {
                return Err(RequestError::UnknownOrderAlias {
                    alias: alias.clone(),
                });
            }
        }

        Ok(())
    }
}
