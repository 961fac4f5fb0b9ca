//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check that secrets required by the selected store are present
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, StoreBackend};

/// Minimum length of the session signing secret, in bytes.
pub const MIN_SESSION_SECRET_LEN: usize = 16;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    match url::Url::parse(&config.app.domain) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "app.domain",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("app.domain", e.to_string())),
    }

    if config.auth.username.is_empty() {
        errors.push(ValidationError::new("auth.username", "must not be empty"));
    }
    if config.auth.password.is_empty() {
        errors.push(ValidationError::new("auth.password", "must not be empty"));
    }

    if config.session.secret.len() < MIN_SESSION_SECRET_LEN {
        errors.push(ValidationError::new(
            "session.secret",
            format!("must be at least {} bytes", MIN_SESSION_SECRET_LEN),
        ));
    }
    if config.session.cookie_name.is_empty() {
        errors.push(ValidationError::new("session.cookie_name", "must not be empty"));
    }

    if config.store.backend == StoreBackend::Dropbox {
        if config.store.access_token.is_empty() {
            errors.push(ValidationError::new(
                "store.access_token",
                "required for the dropbox backend",
            ));
        }
        if url::Url::parse(&config.store.api_base).is_err() {
            errors.push(ValidationError::new("store.api_base", "must be an absolute URL"));
        }
    }
    if config.store.timeout_secs == 0 {
        errors.push(ValidationError::new("store.timeout_secs", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auth.username = "user".into();
        config.auth.password = "pass".into();
        config.session.secret = "0123456789abcdef0123".into();
        config.store.access_token = "token".into();
        config
    }

    #[test]
    fn accepts_valid_config() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn reports_every_error() {
        let mut config = valid_config();
        config.auth.username.clear();
        config.session.secret = "short".into();
        config.app.domain = "ftp://example.com".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["app.domain", "auth.username", "session.secret"]);
    }

    #[test]
    fn memory_backend_needs_no_token() {
        let mut config = valid_config();
        config.store.backend = StoreBackend::Memory;
        config.store.access_token.clear();
        assert!(validate_config(&config).is_ok());

        config.store.backend = StoreBackend::Dropbox;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "store.access_token");
    }

    #[test]
    fn rejects_bad_bind_address() {
        let mut config = valid_config();
        config.listener.bind_address = "localhost".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.bind_address");
    }
}
