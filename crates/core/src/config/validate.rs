use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Public base URL, when set, is an absolute http(s) URL
/// - Staging and output roots differ
/// - Output capture limit is not 0
/// - Admission limit, when set, is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(base) = &config.server.public_base_url {
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "server.public_base_url must start with http:// or https://, got '{}'",
                base
            )));
        }
    }

    // Workspace validation
    if config.workspace.staging_root == config.workspace.output_root {
        return Err(ConfigError::ValidationError(
            "workspace.staging_root and workspace.output_root must differ".to_string(),
        ));
    }

    if config.runner.max_captured_bytes == 0 {
        return Err(ConfigError::ValidationError(
            "runner.max_captured_bytes cannot be 0".to_string(),
        ));
    }

    if config.orchestrator.max_concurrent_jobs == Some(0) {
        return Err(ConfigError::ValidationError(
            "orchestrator.max_concurrent_jobs cannot be 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::WorkspaceConfig;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let mut config = Config::default();
        config.server.port = 0;
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = Config::default();
        config.server.public_base_url = Some("media.example.com".to_string());
        assert!(validate_config(&config).is_err());

        config.server.public_base_url = Some("https://media.example.com".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_same_roots_fails() {
        let mut config = Config::default();
        config.workspace = WorkspaceConfig::with_roots("/tmp/jobs", "/tmp/jobs");
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_limits_fail() {
        let mut config = Config::default();
        config.runner.max_captured_bytes = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.orchestrator.max_concurrent_jobs = Some(0);
        assert!(validate_config(&config).is_err());
    }
}
