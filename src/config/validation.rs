use crate::config::types::{Config, RunConfig, RunSection, ScreenshotConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the sections of a configuration file
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_run_section(&config.run)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_screenshot_config(&config.screenshot)?;
    Ok(())
}

/// Validates the configuration after command-line overrides were applied
pub fn validate_run_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.targets.is_empty() {
        return Err(ConfigError::Validation(
            "at least one target is required".to_string(),
        ));
    }

    if config.output_root.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output_root cannot be empty".to_string(),
        ));
    }

    if config.site_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "timeout must be at least 1 second".to_string(),
        ));
    }

    if config.fetch_timeout.is_zero() {
        return Err(ConfigError::Validation(
            "fetch timeout must be at least 1 second".to_string(),
        ));
    }

    validate_user_agent_config(&config.user_agent)?;
    validate_screenshot_config(&config.screenshot)?;
    Ok(())
}

/// Validates run behavior configuration
fn validate_run_section(config: &RunSection) -> Result<(), ConfigError> {
    if config.output_root.is_empty() {
        return Err(ConfigError::Validation(
            "output-root cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout-secs must be >= 1".to_string(),
        ));
    }

    if config.fetch_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "fetch-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters, '-' and '_', got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates headless browser configuration
fn validate_screenshot_config(config: &ScreenshotConfig) -> Result<(), ConfigError> {
    if config.viewport_width == 0 || config.viewport_height == 0 {
        return Err(ConfigError::Validation(format!(
            "viewport must be non-zero, got {}x{}",
            config.viewport_width, config.viewport_height
        )));
    }

    if matches!(config.chrome_path.as_deref(), Some("")) {
        return Err(ConfigError::Validation(
            "chrome-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}
