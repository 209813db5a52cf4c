// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::RailwatchConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every problem instead of stopping at the first.
pub fn validate_config(config: &RailwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.server.host.trim().is_empty() {
        fail("server.host must not be empty".to_string());
    }

    if !LOG_LEVELS.contains(&config.server.log_level.as_str()) {
        fail(format!(
            "server.log_level `{}` is not one of {}",
            config.server.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.server.max_upload_bytes == 0 {
        fail("server.max_upload_bytes must be greater than zero".to_string());
    }

    for (key, url) in [
        ("inference.base_url", &config.inference.base_url),
        ("cms.base_url", &config.cms.base_url),
        ("chat.base_url", &config.chat.base_url),
    ] {
        if !is_http_url(url) {
            fail(format!("{key} `{url}` must start with http:// or https://"));
        }
    }

    if config.cms.collection.trim().is_empty() {
        fail("cms.collection must not be empty".to_string());
    }

    if config.chat.model.trim().is_empty() {
        fail("chat.model must not be empty".to_string());
    }

    if config.chat.system_prompt.trim().is_empty() {
        fail("chat.system_prompt must not be empty".to_string());
    }

    for (key, timeout) in [
        ("inference.timeout_secs", config.inference.timeout_secs),
        ("cms.timeout_secs", config.cms.timeout_secs),
        ("chat.timeout_secs", config.chat.timeout_secs),
    ] {
        if timeout == Some(0) {
            fail(format!("{key} must be greater than zero when set"));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    matches!(rest, Some(host) if !host.trim().is_empty())
}
