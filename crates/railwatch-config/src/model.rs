// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Railwatch gateway.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Railwatch configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to the local development topology.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RailwatchConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Inference engine (alerts, summaries, predictions, image analysis).
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Headless CMS holding maintenance logs.
    #[serde(default)]
    pub cms: CmsConfig,

    /// OpenAI-compatible chat provider.
    #[serde(default)]
    pub chat: ChatConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Largest accepted request body for image uploads, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Allow any origin. The dashboard is served from a different port.
    #[serde(default = "default_true")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_upload_bytes: default_max_upload_bytes(),
            cors_permissive: true,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_true() -> bool {
    true
}

/// Inference engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InferenceConfig {
    /// Base URL; endpoint paths are appended to it.
    #[serde(default = "default_inference_url")]
    pub base_url: String,

    /// Whole-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_url(),
            timeout_secs: None,
        }
    }
}

fn default_inference_url() -> String {
    "http://localhost:8000".to_string()
}

/// CMS configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CmsConfig {
    /// Base URL of the CMS REST API.
    #[serde(default = "default_cms_url")]
    pub base_url: String,

    /// Collection holding maintenance logs.
    #[serde(default = "default_collection")]
    pub collection: String,

    /// Whole-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            base_url: default_cms_url(),
            collection: default_collection(),
            timeout_secs: None,
        }
    }
}

fn default_cms_url() -> String {
    "http://localhost:1337/api".to_string()
}

fn default_collection() -> String {
    "maintenance-logs".to_string()
}

/// Chat provider configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_chat_url")]
    pub base_url: String,

    /// Bearer token. Also read from `OPENROUTER_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with every completion request.
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// System prompt prepended to every exchange.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Whole-request timeout. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: default_chat_url(),
            api_key: None,
            model: default_chat_model(),
            system_prompt: default_system_prompt(),
            timeout_secs: None,
        }
    }
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_chat_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_chat_model() -> String {
    "deepseek/deepseek-r1:free".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful railways assistant. Reply concisely and professionally.".to_string()
}

impl RailwatchConfig {
    /// Copy of the configuration safe to print: secrets replaced.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.chat.api_key.is_some() {
            copy.chat.api_key = Some("[redacted]".to_string());
        }
        copy
    }
}
