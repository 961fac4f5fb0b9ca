//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variables that override secrets from the config file.
pub const ENV_USERNAME: &str = "CAPTURE_USERNAME";
pub const ENV_PASSWORD: &str = "CAPTURE_PASSWORD";
pub const ENV_SESSION_SECRET: &str = "CAPTURE_SESSION_SECRET";
pub const ENV_DROPBOX_TOKEN: &str = "CAPTURE_DROPBOX_TOKEN";
pub const ENV_DOMAIN: &str = "CAPTURE_DOMAIN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, applying environment overrides.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: AppConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load configuration from defaults plus environment only.
pub fn load_from_env() -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::default();

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overwrite secret fields with values from `lookup`, when present and non-empty.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let targets: [(&str, &mut String); 5] = [
        (ENV_USERNAME, &mut config.auth.username),
        (ENV_PASSWORD, &mut config.auth.password),
        (ENV_SESSION_SECRET, &mut config.session.secret),
        (ENV_DROPBOX_TOKEN, &mut config.store.access_token),
        (ENV_DOMAIN, &mut config.app.domain),
    ];

    for (key, field) in targets {
        if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
            *field = value;
        }
    }
}
