// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error translation from upstream failures to client responses.
//!
//! Every failure a handler can observe ends up as a [`GatewayError`]: a kind,
//! the route's fixed message, and optionally a gateway-side detail string.
//! Upstream bodies are logged here and never copied into the response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use railwatch_core::UpstreamError;
use serde::Serialize;
use strum::Display;
use thiserror::Error;
use tracing::{error, warn};

use crate::normalize::ShapeError;

/// Gateway-level classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    UpstreamUnreachable,
    UpstreamBadStatus,
    UpstreamShapeError,
    ClientInputError,
    Internal,
}

impl ErrorKind {
    /// HTTP status returned to the caller for this kind.
    pub fn status(self) -> StatusCode {
        match self {
            Self::ClientInputError => StatusCode::BAD_REQUEST,
            Self::UpstreamUnreachable
            | Self::UpstreamBadStatus
            | Self::UpstreamShapeError
            | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// The fixed messages a route reports on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteErrors {
    /// Reported when the upstream is unreachable or answers non-2xx.
    pub failure: &'static str,
    /// Reported when the upstream answers 2xx with an unusable shape.
    pub invalid: &'static str,
    /// Whether the failure kind is described in `details`.
    pub describe: bool,
}

impl RouteErrors {
    const fn same(message: &'static str) -> Self {
        Self {
            failure: message,
            invalid: message,
            describe: false,
        }
    }

    const fn cms(failure: &'static str) -> Self {
        Self {
            failure,
            invalid: "Invalid response from Strapi",
            describe: false,
        }
    }
}

pub const ALERTS: RouteErrors = RouteErrors::same("Failed to fetch alerts from AI Engine.");
pub const SUMMARIZE: RouteErrors = RouteErrors::same("Failed to get summary from AI Engine");
pub const ANALYZE_IMAGE: RouteErrors = RouteErrors::same("Failed to analyze image");
pub const PREDICT: RouteErrors = RouteErrors::same("Failed to get prediction from AI Engine");
pub const PARSE_REPORT: RouteErrors = RouteErrors::same("Failed to parse operator report");
pub const LIST_LOGS: RouteErrors = RouteErrors::cms("Failed to fetch logs from CMS");
pub const CREATE_LOG: RouteErrors = RouteErrors::cms("Failed to create maintenance log");
pub const UPDATE_LOG: RouteErrors = RouteErrors::cms("Failed to update maintenance log");
pub const DELETE_LOG: RouteErrors = RouteErrors::same("Failed to delete maintenance log");
pub const CHAT: RouteErrors = RouteErrors {
    failure: "Chatbot error",
    invalid: "Chatbot error",
    describe: true,
};

/// Messages for failures that never reach an upstream.
pub const INVALID_BODY: &str = "Invalid request body";
pub const FILE_UPLOAD_ERROR: &str = "File upload error";
pub const NO_IMAGE: &str = "No image file uploaded";
pub const MISSING_MESSAGE: &str = "Missing message";
pub const INVALID_HISTORY: &str = "Invalid chat history";
pub const NOT_FOUND: &str = "Not found";
pub const INTERNAL: &str = "Internal server error";

/// JSON body of every failed response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A translated failure, ready to be written to the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub message: &'static str,
    pub details: Option<String>,
}

impl GatewayError {
    pub fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            details: None,
        }
    }

    /// The caller sent something unusable. `details` says what.
    pub fn client_input(message: &'static str, details: impl Into<String>) -> Self {
        let details = details.into();
        warn!(reason = message, details = %details, "rejected client input");
        Self {
            kind: ErrorKind::ClientInputError,
            message,
            details: Some(details),
        }
    }

    /// Translate an upstream failure using the route's messages.
    pub fn from_upstream(route: RouteErrors, err: UpstreamError) -> Self {
        let (kind, message, summary) = match &err {
            UpstreamError::Unreachable { .. } => (
                ErrorKind::UpstreamUnreachable,
                route.failure,
                "upstream unreachable".to_string(),
            ),
            UpstreamError::BadStatus { status, .. } => (
                ErrorKind::UpstreamBadStatus,
                route.failure,
                format!("upstream returned status {status}"),
            ),
            UpstreamError::MalformedBody { .. } => (
                ErrorKind::UpstreamShapeError,
                route.invalid,
                "upstream returned a malformed body".to_string(),
            ),
            UpstreamError::InvalidRequest { .. } => (
                ErrorKind::Internal,
                route.failure,
                "upstream request could not be built".to_string(),
            ),
        };

        match &err {
            UpstreamError::BadStatus { body, .. } => error!(
                upstream = %err.upstream(),
                kind = %kind,
                body = %body,
                error = %err,
                "{message}"
            ),
            _ => error!(upstream = %err.upstream(), kind = %kind, error = %err, "{message}"),
        }

        Self {
            kind,
            message,
            details: route.describe.then_some(summary),
        }
    }

    /// A 2xx upstream payload failed normalization.
    pub fn shape(route: RouteErrors, err: ShapeError) -> Self {
        error!(kind = %ErrorKind::UpstreamShapeError, error = %err, "{}", route.invalid);
        Self {
            kind: ErrorKind::UpstreamShapeError,
            message: route.invalid,
            details: route.describe.then(|| err.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.message.to_string(),
            details: self.details.clone(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
