//! Service configuration.
//!
//! Configuration is read from an optional TOML file and overridden by
//! `FFJOBS_`-prefixed environment variables, with `__` separating nested
//! keys (`FFJOBS_SERVER__PORT=9000`). Every field has a default.

mod loader;
mod types;
mod validate;

pub use loader::{load_config, load_config_from_env, load_config_from_str, ENV_PREFIX};
pub use types::*;
pub use validate::validate_config;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
