// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Railwatch gateway.

use strum::Display;
use thiserror::Error;

/// Maximum number of bytes of an upstream error body kept for logging.
pub const MAX_LOGGED_BODY: usize = 512;

/// The external services the gateway talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Upstream {
    /// Machine-learning inference/analysis backend.
    Inference,
    /// Headless CMS holding the maintenance logs.
    Cms,
    /// OpenAI-compatible LLM chat provider.
    Chat,
}

/// A failure observed while calling an upstream service.
///
/// Every upstream call is a single attempt; whichever variant comes back is
/// terminal for the request that triggered it.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, DNS failure, timeout, or any transport error
    /// before a response status was received.
    #[error("{upstream} unreachable: {source}")]
    Unreachable {
        upstream: Upstream,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The upstream answered with a non-2xx status.
    ///
    /// `body` is an excerpt for server-side logs and is never shown to callers.
    #[error("{upstream} returned {status}")]
    BadStatus {
        upstream: Upstream,
        status: u16,
        body: String,
    },

    /// The upstream answered 2xx but the body was not JSON.
    #[error("{upstream} returned a malformed body: {detail}")]
    MalformedBody { upstream: Upstream, detail: String },

    /// The outbound request could not be built (bad URL, bad header value).
    #[error("invalid request to {upstream}: {detail}")]
    InvalidRequest { upstream: Upstream, detail: String },
}

impl UpstreamError {
    /// Which upstream produced this error.
    pub fn upstream(&self) -> Upstream {
        match self {
            Self::Unreachable { upstream, .. }
            | Self::BadStatus { upstream, .. }
            | Self::MalformedBody { upstream, .. }
            | Self::InvalidRequest { upstream, .. } => *upstream,
        }
    }
}

/// Truncate an upstream body to [`MAX_LOGGED_BODY`] bytes on a char boundary.
pub fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_LOGGED_BODY {
        return body.to_string();
    }
    let mut end = MAX_LOGGED_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

/// The primary error type used by startup and server code.
#[derive(Debug, Error)]
pub enum RailwatchError {
    /// An upstream call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The HTTP server could not bind or stopped with an error.
    #[error("server error: {message}")]
    Server {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn upstream_display_is_lowercase() {
        assert_eq!(Upstream::Inference.to_string(), "inference");
        assert_eq!(Upstream::Cms.to_string(), "cms");
        assert_eq!(Upstream::Chat.to_string(), "chat");
    }

    #[test]
    fn upstream_accessor_covers_all_variants() {
        let errors = [
            UpstreamError::Unreachable {
                upstream: Upstream::Cms,
                source: Box::new(std::io::Error::other("refused")),
            },
            UpstreamError::BadStatus {
                upstream: Upstream::Cms,
                status: 502,
                body: String::new(),
            },
            UpstreamError::MalformedBody {
                upstream: Upstream::Cms,
                detail: "eof".into(),
            },
            UpstreamError::InvalidRequest {
                upstream: Upstream::Cms,
                detail: "bad url".into(),
            },
        ];
        for err in &errors {
            assert_eq!(err.upstream(), Upstream::Cms);
        }
    }

    #[test]
    fn bad_status_display_omits_body() {
        let err = UpstreamError::BadStatus {
            upstream: Upstream::Chat,
            status: 401,
            body: "secret upstream detail".into(),
        };
        let text = err.to_string();
        assert_eq!(text, "chat returned 401");
        assert!(!text.contains("secret"));
    }

    #[test]
    fn railwatch_error_wraps_upstream_transparently() {
        let err: RailwatchError = UpstreamError::MalformedBody {
            upstream: Upstream::Inference,
            detail: "expected value".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "inference returned a malformed body: expected value"
        );
    }

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
    }

    proptest! {
        #[test]
        fn truncate_never_exceeds_limit_and_never_panics(s in "\\PC{0,2000}") {
            let out = truncate_body(&s);
            // Ellipsis adds at most 3 bytes.
            prop_assert!(out.len() <= MAX_LOGGED_BODY + 3);
            if s.len() <= MAX_LOGGED_BODY {
                prop_assert_eq!(out, s);
            }
        }
    }
}
