// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes. Collects every violation instead of failing fast so a broken
//! config file is fixed in one pass.

use thiserror::Error;

use crate::model::BodegaConfig;

/// A configuration problem, either from parsing or from validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config validation error: {0}")]
    Validation(String),
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns all collected validation errors rather than the first one.
pub fn validate_config(config: &BodegaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.store.name.trim().is_empty() {
        errors.push(ConfigError::Validation("store.name must not be empty".to_string()));
    }

    let level = config.store.log_level.as_str();
    if !matches!(level, "trace" | "debug" | "info" | "warn" | "error") {
        errors.push(ConfigError::Validation(format!(
            "store.log_level must be one of trace/debug/info/warn/error, got `{level}`"
        )));
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation(
            "storage.database_path must not be empty".to_string(),
        ));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation("gateway.host must not be empty".to_string()));
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname =
            host.chars().all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            )));
        }
    }

    for (section, url) in [
        ("whatsapp.base_url", &config.whatsapp.base_url),
        ("lookup.base_url", &config.lookup.base_url),
        ("payments.base_url", &config.payments.base_url),
    ] {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            errors.push(ConfigError::Validation(format!(
                "{section} must start with http:// or https://, got `{url}`"
            )));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Render collected config errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for error in errors {
        eprintln!("bodega: {error}");
    }
}
