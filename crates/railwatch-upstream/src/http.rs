// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared single-attempt HTTP plumbing for the upstream clients.
//!
//! Each client owns one [`UpstreamHttp`]: a base URL, a `reqwest::Client`
//! carrying the upstream's default headers, and the logic that classifies
//! the outcome of a call into an [`UpstreamError`].

use std::time::Duration;

use railwatch_core::error::truncate_body;
use railwatch_core::{Upstream, UpstreamError};
use reqwest::header::HeaderMap;
use reqwest::{Method, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

/// Base URL, HTTP client and error classification for one upstream.
#[derive(Debug, Clone)]
pub struct UpstreamHttp {
    upstream: Upstream,
    client: reqwest::Client,
    base_url: Url,
}

impl UpstreamHttp {
    /// Build the client for `upstream`.
    ///
    /// `timeout` bounds each whole call; `None` leaves calls unbounded.
    pub fn new(
        upstream: Upstream,
        base_url: &str,
        timeout: Option<Duration>,
        headers: HeaderMap,
    ) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(base_url).map_err(|e| UpstreamError::InvalidRequest {
            upstream,
            detail: format!("invalid base URL `{base_url}`: {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidRequest {
                upstream,
                detail: format!("base URL `{base_url}` cannot carry a path"),
            });
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| UpstreamError::InvalidRequest {
            upstream,
            detail: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            upstream,
            client,
            base_url,
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, escaping each one.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start a request against `segments` below the base URL.
    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.client.request(method, self.endpoint(segments))
    }

    /// Send once and decode a 2xx JSON body. An empty 2xx body decodes as `null`.
    pub async fn send_json(&self, request: RequestBuilder) -> Result<Value, UpstreamError> {
        let response = self.send(request).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|e| UpstreamError::MalformedBody {
            upstream: self.upstream,
            detail: e.to_string(),
        })
    }

    /// Send once, requiring only a 2xx status. The body is discarded.
    pub async fn send_discarding(&self, request: RequestBuilder) -> Result<(), UpstreamError> {
        self.send(request).await.map(drop)
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, UpstreamError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        debug!(upstream = %self.upstream, url = %response.url(), status = %status, "upstream responded");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(UpstreamError::BadStatus {
            upstream: self.upstream,
            status: status.as_u16(),
            body: truncate_body(&body),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> UpstreamError {
        if e.is_builder() {
            UpstreamError::InvalidRequest {
                upstream: self.upstream,
                detail: e.to_string(),
            }
        } else {
            UpstreamError::Unreachable {
                upstream: self.upstream,
                source: Box::new(e),
            }
        }
    }
}
