//! Configuration for command resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the command of a job is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverStrategy {
    /// Substitute placeholders in the request's command template.
    #[default]
    Template,
    /// Concatenate all inputs into the single declared output.
    Concat,
}

impl fmt::Display for ResolverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverStrategy::Template => f.write_str("template"),
            ResolverStrategy::Concat => f.write_str("concat"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub strategy: ResolverStrategy,

    /// Rewrite `-c:v libx264` to use the ultrafast preset on two threads.
    #[serde(default = "default_low_resource_x264")]
    pub low_resource_x264: bool,

    /// Program used by the concat strategy.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,
}

fn default_low_resource_x264() -> bool {
    true
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: ResolverStrategy::default(),
            low_resource_x264: default_low_resource_x264(),
            ffmpeg_path: default_ffmpeg_path(),
        }
    }
}

impl ResolverConfig {
    pub fn concat() -> Self {
        Self {
            strategy: ResolverStrategy::Concat,
            ..Default::default()
        }
    }

    pub fn with_low_resource_x264(mut self, enabled: bool) -> Self {
        self.low_resource_x264 = enabled;
        self
    }
}
