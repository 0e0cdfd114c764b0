//! Concat strategy: join every input into the single declared output.

use std::path::PathBuf;

use super::config::ResolverConfig;
use super::error::TemplateError;
use super::{path_text, ResolvedCommand};
use crate::fetcher::InputPaths;
use crate::job::JobRequest;
use crate::workspace::Workspace;

/// Name of the list file written to the staging directory.
pub const CONCAT_LIST_FILE: &str = "concat_list.txt";

/// One line of an FFmpeg concat demuxer list.
pub fn concat_list_entry(path: &str) -> String {
    format!("file '{}'", path.replace('\'', r"'\''"))
}

/// Inputs in concatenation order.
///
/// An explicit `input_order` wins and must name every input exactly once;
/// otherwise inputs are ordered by alias.
fn ordered_inputs<'a>(
    request: &JobRequest,
    inputs: &'a InputPaths,
) -> Result<Vec<&'a PathBuf>, TemplateError> {
    let Some(order) = &request.input_order else {
        return Ok(inputs.values().collect());
    };

    if order.len() != inputs.len() {
        return Err(TemplateError::InputOrder {
            reason: format!(
                "{} aliases listed for {} inputs",
                order.len(),
                inputs.len()
            ),
        });
    }

    let mut ordered = Vec::with_capacity(order.len());
    for alias in order {
        let path = inputs.get(alias).ok_or_else(|| TemplateError::InputOrder {
            reason: format!("unknown input alias '{}'", alias),
        })?;
        if ordered.contains(&path) {
            return Err(TemplateError::InputOrder {
                reason: format!("alias '{}' listed twice", alias),
            });
        }
        ordered.push(path);
    }
    Ok(ordered)
}

pub(super) async fn resolve_concat(
    config: &ResolverConfig,
    request: &JobRequest,
    inputs: &InputPaths,
    workspace: &Workspace,
) -> Result<ResolvedCommand, TemplateError> {
    if request.output_files.len() != 1 {
        return Err(TemplateError::ConcatOutputs {
            count: request.output_files.len(),
        });
    }
    if inputs.is_empty() {
        return Err(TemplateError::ConcatInputs);
    }

    let ordered = ordered_inputs(request, inputs)?;
    let mut list = String::new();
    for path in ordered {
        list.push_str(&concat_list_entry(&path_text(path)));
        list.push('\n');
    }

    let list_path = workspace.staging_dir.join(CONCAT_LIST_FILE);
    tokio::fs::write(&list_path, list)
        .await
        .map_err(|source| TemplateError::ListFile {
            path: list_path.clone(),
            source,
        })?;

    let output = request
        .output_files
        .values()
        .next()
        .map(|filename| workspace.output_dir.join(filename))
        .ok_or(TemplateError::ConcatOutputs { count: 0 })?;

    let list_arg = path_text(&list_path);
    let output_arg = path_text(&output);
    let args = [
        config.ffmpeg_path.as_str(),
        "-y",
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
        list_arg.as_str(),
        "-c:v",
        "libx264",
        "-preset",
        "ultrafast",
        "-threads",
        "2",
        "-c:a",
        "aac",
        output_arg.as_str(),
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    Ok(ResolvedCommand {
        args,
        outputs: request.output_files.clone(),
    })
}
