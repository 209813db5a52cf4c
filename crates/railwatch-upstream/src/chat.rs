// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client for the OpenAI-compatible chat provider.
//!
//! Every exchange sent upstream is the configured system prompt, then the
//! caller's history in the order given, then the new user message.

use std::time::Duration;

use railwatch_config::model::ChatConfig;
use railwatch_core::{ChatMessage, Upstream, UpstreamError};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// Body of a chat-completions request.
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

/// HTTP client for `{base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: crate::http::UpstreamHttp,
    model: String,
    system_prompt: String,
}

impl ChatClient {
    /// Build the client. The API key, if any, becomes a default bearer header.
    pub fn new(config: &ChatConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();
        match config.api_key.as_deref() {
            Some(key) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                    UpstreamError::InvalidRequest {
                        upstream: Upstream::Chat,
                        detail: format!("invalid API key header value: {e}"),
                    }
                })?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => warn!("chat.api_key is not set; chat requests will be sent unauthenticated"),
        }

        let http = crate::http::UpstreamHttp::new(
            Upstream::Chat,
            &config.base_url,
            config.timeout_secs.map(Duration::from_secs),
            headers,
        )?;

        Ok(Self {
            http,
            model: config.model.clone(),
            system_prompt: config.system_prompt.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url().as_str()
    }

    /// Send one completion request for `message` following `history`.
    ///
    /// Returns the provider's raw JSON; extracting the reply is the caller's job.
    pub async fn complete(
        &self,
        history: Vec<ChatMessage>,
        message: String,
    ) -> Result<Value, UpstreamError> {
        let messages = build_exchange(&self.system_prompt, history, message);
        let request = self
            .http
            .request(Method::POST, &["chat", "completions"])
            .json(&CompletionRequest {
                model: &self.model,
                messages: &messages,
            });
        self.http.send_json(request).await
    }
}

/// Assemble the message list sent upstream: system, history, then the new user turn.
pub fn build_exchange(
    system_prompt: &str,
    history: Vec<ChatMessage>,
    message: String,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system_prompt));
    messages.extend(history);
    messages.push(ChatMessage::user(message));
    messages
}
