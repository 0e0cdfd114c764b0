//! Command resolution: turning a request into an argument vector.
//!
//! Two strategies exist, chosen by deployment configuration:
//!
//! - `template`: the request's command template has its `{{alias}}`
//!   placeholders replaced by local input and output paths and is then split
//!   into words with shell quoting rules (no shell is ever run).
//! - `concat`: the inputs are written, in order, to an FFmpeg concat list
//!   file and a fixed low-resource re-encode command is produced.
//!
//! Placeholders naming unknown aliases are left untouched on purpose, so a
//! template may contain literal `{{...}}` text.

mod concat;
mod config;
mod error;
mod template;

pub use concat::{concat_list_entry, CONCAT_LIST_FILE};
pub use config::{ResolverConfig, ResolverStrategy};
pub use error::TemplateError;
pub use template::{apply_low_resource_x264, substitute, tokenize};

use std::path::Path;
use tracing::debug;

use crate::fetcher::InputPaths;
use crate::job::{AliasMap, JobRequest};
use crate::workspace::{is_plain_file_name, Workspace};

/// A command ready to be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    /// Program followed by its arguments.
    pub args: Vec<String>,
    /// Declared alias -> output file name, unchanged from the request.
    pub outputs: AliasMap,
}

impl ResolvedCommand {
    /// Human readable rendering of the command, for logs.
    pub fn command_line(&self) -> String {
        shlex::try_join(self.args.iter().map(String::as_str))
            .unwrap_or_else(|_| self.args.join(" "))
    }
}

/// Builds executable commands from job requests.
#[derive(Debug, Clone, Default)]
pub struct CommandResolver {
    config: ResolverConfig,
}

impl CommandResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Resolves `request` against the fetched inputs and the job workspace.
    pub async fn resolve(
        &self,
        request: &JobRequest,
        inputs: &InputPaths,
        workspace: &Workspace,
    ) -> Result<ResolvedCommand, TemplateError> {
        check_output_names(&request.output_files)?;

        let command = match self.config.strategy {
            ResolverStrategy::Template => {
                template::resolve_template(&self.config, request, inputs, &workspace.output_dir)?
            }
            ResolverStrategy::Concat => {
                concat::resolve_concat(&self.config, request, inputs, workspace).await?
            }
        };

        debug!(
            job_id = %workspace.job_id,
            strategy = %self.config.strategy,
            argc = command.args.len(),
            "Command resolved"
        );
        Ok(command)
    }
}

fn check_output_names(outputs: &AliasMap) -> Result<(), TemplateError> {
    for (alias, filename) in outputs {
        if !is_plain_file_name(filename) {
            return Err(TemplateError::InvalidOutputFilename {
                alias: alias.clone(),
                filename: filename.clone(),
            });
        }
    }
    Ok(())
}

fn path_text(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
