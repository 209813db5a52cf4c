// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./railwatch.toml` > `~/.config/railwatch/railwatch.toml`
//! > `/etc/railwatch/railwatch.toml` with environment variable overrides via the
//! `RAILWATCH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::RailwatchConfig;

/// Environment variable the chat provider's key is conventionally deployed under.
pub const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/railwatch/railwatch.toml` (system-wide)
/// 3. `~/.config/railwatch/railwatch.toml` (user XDG config)
/// 4. `./railwatch.toml` (local directory)
/// 5. `OPENROUTER_API_KEY`
/// 6. `RAILWATCH_*` environment variables
pub fn load_config() -> Result<RailwatchConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<RailwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RailwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RailwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RailwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(openrouter_key_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RailwatchConfig::default()))
        .merge(Toml::file("/etc/railwatch/railwatch.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("railwatch/railwatch.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("railwatch.toml"))
        .merge(openrouter_key_provider())
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `RAILWATCH_CHAT_API_KEY` must map to `chat.api_key`, not `chat.api.key`.
fn env_provider() -> Env {
    Env::prefixed("RAILWATCH_").map(|key| {
        // figment maps before lowercasing: `key` arrives as "CMS_BASE_URL".
        let key_str = key.as_str().to_ascii_lowercase();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("inference_", "inference.", 1)
            .replacen("cms_", "cms.", 1)
            .replacen("chat_", "chat.", 1);
        mapped.into()
    })
}

/// Accept the bare `OPENROUTER_API_KEY` as `chat.api_key`.
fn openrouter_key_provider() -> Env {
    Env::raw()
        .only(&[OPENROUTER_KEY_VAR])
        .map(|_| "chat.api_key".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("RAILWATCH_CMS_BASE_URL", "http://cms.internal:1337/api");
            jail.set_env("RAILWATCH_SERVER_PORT", "8081");
            jail.set_env("RAILWATCH_CHAT_TIMEOUT_SECS", "30");
            let config = load_config().expect("env overrides should load");
            assert_eq!(config.cms.base_url, "http://cms.internal:1337/api");
            assert_eq!(config.server.port, 8081);
            assert_eq!(config.chat.timeout_secs, Some(30));
            Ok(())
        });
    }

    #[test]
    fn openrouter_key_is_picked_up() {
        Jail::expect_with(|jail| {
            jail.set_env(OPENROUTER_KEY_VAR, "sk-or-from-env");
            let config = load_config().expect("should load");
            assert_eq!(config.chat.api_key.as_deref(), Some("sk-or-from-env"));
            Ok(())
        });
    }

    #[test]
    fn prefixed_key_beats_openrouter_key() {
        Jail::expect_with(|jail| {
            jail.set_env(OPENROUTER_KEY_VAR, "sk-or-generic");
            jail.set_env("RAILWATCH_CHAT_API_KEY", "sk-or-specific");
            let config = load_config().expect("should load");
            assert_eq!(config.chat.api_key.as_deref(), Some("sk-or-specific"));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_every_section() {
        Jail::expect_with(|jail| {
            jail.set_env("RAILWATCH_SERVER_MAX_UPLOAD_BYTES", "1024");
            jail.set_env("RAILWATCH_INFERENCE_BASE_URL", "http://ai-engine:8000");
            jail.set_env("RAILWATCH_CMS_COLLECTION", "track-logs");
            jail.set_env("RAILWATCH_CHAT_MODEL", "test/model");
            let config = load_config().expect("env overrides should load");
            assert_eq!(config.server.max_upload_bytes, 1024);
            assert_eq!(config.inference.base_url, "http://ai-engine:8000");
            assert_eq!(config.cms.collection, "track-logs");
            assert_eq!(config.chat.model, "test/model");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "railwatch.toml",
                r#"
[inference]
base_url = "http://ai-engine:8000"
timeout_secs = 15
"#,
            )?;
            let config = load_config().expect("should load");
            assert_eq!(config.inference.base_url, "http://ai-engine:8000");
            assert_eq!(config.inference.timeout_secs, Some(15));
            assert_eq!(config.server.port, 4000);
            Ok(())
        });
    }
}
