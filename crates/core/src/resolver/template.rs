//! Placeholder substitution and word splitting.

use std::path::Path;

use super::config::ResolverConfig;
use super::error::TemplateError;
use super::{path_text, ResolvedCommand};
use crate::fetcher::InputPaths;
use crate::job::JobRequest;

const X264_CODEC: &str = "-c:v libx264";
const X264_LOW_RESOURCE: &str = "-c:v libx264 -preset ultrafast -threads 2";

/// Replaces `{{alias}}` and `{{ alias }}` with `replacement`.
///
/// Only these two spellings are recognized; anything else is left as is.
pub fn substitute(command: &str, alias: &str, replacement: &str) -> String {
    let tight = format!("{{{{{}}}}}", alias);
    let padded = format!("{{{{ {} }}}}", alias);
    command
        .replace(&tight, replacement)
        .replace(&padded, replacement)
}

/// Makes x264 encodes cheap enough for small hosts.
pub fn apply_low_resource_x264(command: &str) -> String {
    command.replace(X264_CODEC, X264_LOW_RESOURCE)
}

/// Splits a command line into words using shell quoting rules.
pub fn tokenize(command: &str) -> Result<Vec<String>, TemplateError> {
    let args = shlex::split(command).ok_or_else(|| TemplateError::UnbalancedQuotes {
        command: command.to_string(),
    })?;

    if args.is_empty() {
        return Err(TemplateError::EmptyCommand);
    }
    Ok(args)
}

pub(super) fn resolve_template(
    config: &ResolverConfig,
    request: &JobRequest,
    inputs: &InputPaths,
    output_dir: &Path,
) -> Result<ResolvedCommand, TemplateError> {
    let mut command = request.ffmpeg_command.clone();

    for (alias, path) in inputs {
        command = substitute(&command, alias, &path_text(path));
    }

    for (alias, filename) in &request.output_files {
        command = substitute(&command, alias, &path_text(&output_dir.join(filename)));
    }

    if config.low_resource_x264 {
        command = apply_low_resource_x264(&command);
    }

    Ok(ResolvedCommand {
        args: tokenize(&command)?,
        outputs: request.output_files.clone(),
    })
}
