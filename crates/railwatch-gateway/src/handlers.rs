// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway routes.
//!
//! Each handler picks one upstream client, makes one call, and hands the
//! result to the normalizer or the error translator. None of them hold state.

use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, Multipart, Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use railwatch_core::{ChatMessage, ChatRole, LogFields, MaintenanceLogEntry, Severity, UpstreamError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{
    self, ErrorEnvelope, GatewayError, GatewayResult, RouteErrors, FILE_UPLOAD_ERROR,
    INVALID_BODY, INVALID_HISTORY, MISSING_MESSAGE, NOT_FOUND,
};
use crate::normalize;
use crate::relay;
use crate::server::GatewayState;

/// Request body for POST /chat.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// Response body for POST /chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub content: String,
}

/// Response body for DELETE /logs/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub status: &'static str,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Unwrap an extracted JSON body or reject it as client input.
fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> GatewayResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| GatewayError::client_input(INVALID_BODY, rejection.body_text()))
}

fn upstream(route: RouteErrors) -> impl FnOnce(UpstreamError) -> GatewayError {
    move |err| GatewayError::from_upstream(route, err)
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /alerts
///
/// Never fails on shape: a payload that is not an array, or not JSON at all,
/// comes back as `[]`.
pub async fn get_alerts(State(state): State<GatewayState>) -> GatewayResult<Json<Vec<Value>>> {
    let payload = match state.inference.alerts().await {
        Ok(payload) => payload,
        Err(UpstreamError::MalformedBody { detail, .. }) => {
            warn!(detail = %detail, "alerts payload is not JSON, returning no alerts");
            Value::Null
        }
        Err(err) => return Err(GatewayError::from_upstream(error::ALERTS, err)),
    };

    let alerts = normalize::alerts(payload);
    let high = alerts
        .iter()
        .filter(|alert| {
            Severity::from_label(alert.get("severity").and_then(Value::as_str)) == Severity::High
        })
        .count();
    debug!(total = alerts.len(), high, "fetched alerts");
    Ok(Json(alerts))
}

/// POST /summarize
pub async fn summarize(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> GatewayResult<Json<Value>> {
    let rows = json_body(body)?;
    let summary = state
        .inference
        .summarize(&rows)
        .await
        .map_err(upstream(error::SUMMARIZE))?;
    Ok(Json(summary))
}

/// POST /analyze-image
pub async fn analyze_image(
    State(state): State<GatewayState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> GatewayResult<Json<Value>> {
    let multipart = multipart
        .map_err(|rejection| GatewayError::client_input(FILE_UPLOAD_ERROR, rejection.body_text()))?;
    relay::relay_image(&state.inference, multipart).await.map(Json)
}

/// POST /predict
pub async fn predict(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> GatewayResult<Json<Value>> {
    let rows = json_body(body)?;
    let prediction = state
        .inference
        .predict(&rows)
        .await
        .map_err(upstream(error::PREDICT))?;
    Ok(Json(prediction))
}

/// POST /parse-report
pub async fn parse_report(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> GatewayResult<Json<Value>> {
    let report = json_body(body)?;
    let parsed = state
        .inference
        .parse_report(&report)
        .await
        .map_err(upstream(error::PARSE_REPORT))?;
    Ok(Json(parsed))
}

/// GET /logs
pub async fn list_logs(
    State(state): State<GatewayState>,
) -> GatewayResult<Json<Vec<MaintenanceLogEntry>>> {
    let payload = state
        .cms
        .list_logs()
        .await
        .map_err(upstream(error::LIST_LOGS))?;
    let logs = normalize::log_list(&payload);
    debug!(count = logs.len(), "fetched maintenance logs");
    Ok(Json(logs))
}

/// POST /logs
pub async fn create_log(
    State(state): State<GatewayState>,
    body: Result<Json<LogFields>, JsonRejection>,
) -> GatewayResult<(StatusCode, Json<MaintenanceLogEntry>)> {
    let fields = json_body(body)?;
    let payload = state
        .cms
        .create_log(&fields)
        .await
        .map_err(upstream(error::CREATE_LOG))?;
    let entry = normalize::log_entry(&payload, &fields)
        .map_err(|e| GatewayError::shape(error::CREATE_LOG, e))?;
    info!(id = ?entry.id, zone = %entry.zone, "created maintenance log");
    Ok((StatusCode::CREATED, Json(entry)))
}

/// PUT /logs/{id}
///
/// The id comes from the path; the body carries only the fields to change.
pub async fn update_log(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    body: Result<Json<LogFields>, JsonRejection>,
) -> GatewayResult<Json<MaintenanceLogEntry>> {
    let fields = json_body(body)?;
    let payload = state
        .cms
        .update_log(&id, &fields)
        .await
        .map_err(upstream(error::UPDATE_LOG))?;
    let entry = normalize::log_entry(&payload, &fields)
        .map_err(|e| GatewayError::shape(error::UPDATE_LOG, e))?;
    info!(id = %id, "updated maintenance log");
    Ok(Json(entry))
}

/// DELETE /logs/{id}
pub async fn delete_log(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> GatewayResult<Json<DeleteResponse>> {
    state
        .cms
        .delete_log(&id)
        .await
        .map_err(upstream(error::DELETE_LOG))?;
    info!(id = %id, "deleted maintenance log");
    Ok(Json(DeleteResponse {
        message: format!("Log {id} deleted"),
        status: "success",
    }))
}

/// POST /chat and POST /api/chat
///
/// The gateway owns the system message; callers supply only user and
/// assistant turns.
pub async fn chat(
    State(state): State<GatewayState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> GatewayResult<Json<ChatResponse>> {
    let ChatRequest { message, history } = json_body(body)?;
    if message.trim().is_empty() {
        return Err(GatewayError::client_input(
            MISSING_MESSAGE,
            "`message` must be a non-empty string",
        ));
    }
    if let Some(position) = history.iter().position(|m| m.role == ChatRole::System) {
        return Err(GatewayError::client_input(
            INVALID_HISTORY,
            format!("history[{position}] has role `system`"),
        ));
    }

    let turns = history.len();
    let payload = state
        .chat
        .complete(history, message)
        .await
        .map_err(upstream(error::CHAT))?;
    let content =
        normalize::chat_content(&payload).map_err(|e| GatewayError::shape(error::CHAT, e))?;
    debug!(history = turns, reply_len = content.len(), "chat reply");
    Ok(Json(ChatResponse { content }))
}

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorEnvelope {
            error: NOT_FOUND.to_string(),
            details: None,
        }),
    )
}
