// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response normalization: upstream JSON in, stable gateway shapes out.
//!
//! Every function here is pure and total over JSON values. Where a route
//! cannot answer without some part of the payload, the function yields a
//! [`ShapeError`] naming that part instead of guessing.

use railwatch_core::{LogFields, MaintenanceLogEntry, NOT_AVAILABLE};
use serde_json::Value;
use thiserror::Error;

/// The log fields every entry carries, in wire order.
const LOG_FIELDS: [&str; 4] = ["date", "zone", "description", "engineer"];

/// A 2xx upstream payload that lacks what normalization needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("CMS payload has no `data` object")]
    MissingDataObject,
    #[error("chat payload has no `choices[0].message.content` string")]
    MissingChatContent,
}

/// Normalize a CMS list response `{data: [...]}`.
///
/// A payload without a `data` array lists nothing.
pub fn log_list(payload: &Value) -> Vec<MaintenanceLogEntry> {
    payload
        .get("data")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|item| log_record(item, None)).collect())
        .unwrap_or_default()
}

/// Normalize a CMS write echo `{data: {...}}`.
///
/// Fields the CMS left out fall back to what the caller sent.
pub fn log_entry(payload: &Value, sent: &LogFields) -> Result<MaintenanceLogEntry, ShapeError> {
    let record = payload
        .get("data")
        .filter(|data| data.is_object())
        .ok_or(ShapeError::MissingDataObject)?;
    Ok(log_record(record, Some(sent)))
}

/// Pass an alert list through only if it is an array; anything else is `[]`.
pub fn alerts(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        _ => Vec::new(),
    }
}

/// Extract `choices[0].message.content` from a chat-completions payload.
pub fn chat_content(payload: &Value) -> Result<String, ShapeError> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or(ShapeError::MissingChatContent)
}

fn log_record(record: &Value, sent: Option<&LogFields>) -> MaintenanceLogEntry {
    let attributes = record.get("attributes").filter(|a| a.is_object());
    let field = |name: &str| -> String {
        attributes
            .and_then(|a| a.get(name))
            .and_then(as_text)
            .or_else(|| record.get(name).and_then(as_text))
            .or_else(|| sent.and_then(|s| s.get(name)).map(str::to_string))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    let [date, zone, description, engineer] = LOG_FIELDS.map(field);

    MaintenanceLogEntry {
        id: record.get("id").and_then(Value::as_i64),
        date,
        zone,
        description,
        engineer,
    }
}

/// Scalars render as text; null, arrays and objects count as absent.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
