// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Railwatch configuration system.

use railwatch_config::diagnostic::ConfigError;
use railwatch_config::model::RailwatchConfig;
use railwatch_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_railwatch_config() {
    let toml = r#"
[server]
host = "127.0.0.1"
port = 4100
log_level = "debug"
max_upload_bytes = 1048576
cors_permissive = false

[inference]
base_url = "http://ai-engine:8000"
timeout_secs = 10

[cms]
base_url = "http://strapi:1337/api"
collection = "track-logs"

[chat]
base_url = "https://llm.example.com/v1"
api_key = "sk-test"
model = "some/model"
system_prompt = "Be terse."
timeout_secs = 60
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 4100);
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.server.max_upload_bytes, 1_048_576);
    assert!(!config.server.cors_permissive);
    assert_eq!(config.inference.base_url, "http://ai-engine:8000");
    assert_eq!(config.inference.timeout_secs, Some(10));
    assert_eq!(config.cms.base_url, "http://strapi:1337/api");
    assert_eq!(config.cms.collection, "track-logs");
    assert_eq!(config.cms.timeout_secs, None);
    assert_eq!(config.chat.base_url, "https://llm.example.com/v1");
    assert_eq!(config.chat.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.chat.model, "some/model");
    assert_eq!(config.chat.system_prompt, "Be terse.");
    assert_eq!(config.chat.timeout_secs, Some(60));
}

/// Empty TOML falls back to compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_and_validate_str("").expect("empty config is valid");
    let defaults = RailwatchConfig::default();
    assert_eq!(config.server.port, defaults.server.port);
    assert_eq!(config.cms.collection, defaults.cms.collection);
    assert_eq!(config.chat.system_prompt, defaults.chat.system_prompt);
}

/// Unknown key produces an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_key_reports_suggestion() {
    let toml = r#"
[cms]
colection = "maintenance-logs"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "colection");
            assert_eq!(suggestion.as_deref(), Some("collection"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_rejected() {
    let toml = r#"
[telemetry]
port = 8080
"#;
    let errors = load_and_validate_str(toml).expect_err("unknown section");
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "telemetry"));
}

/// Wrong value type produces an InvalidType diagnostic.
#[test]
fn wrong_type_reports_invalid_type() {
    let toml = r#"
[server]
port = "four thousand"
"#;
    let errors = load_and_validate_str(toml).expect_err("port must be an integer");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key.contains("port")),
        "got {:?}",
        errors
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_loader() {
    let toml = r#"
[chat]
base_url = "openrouter.ai/api/v1"
"#;
    let errors = load_and_validate_str(toml).expect_err("bad url");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("chat.base_url"))));
}

/// Loading from an explicit path reports typos in that file.
#[test]
fn load_from_path_reports_unknown_key() {
    figment::Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[server]\nprot = 4000\n")?;
        let path = jail.directory().join("custom.toml");
        let errors = load_and_validate_path(&path).expect_err("typo should fail");
        match &errors[0] {
            ConfigError::UnknownKey { key, suggestion, .. } => {
                assert_eq!(key, "prot");
                assert_eq!(suggestion.as_deref(), Some("port"));
            }
            other => panic!("expected UnknownKey, got {other:?}"),
        }
        Ok(())
    });
}
