// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway-facing types shared by the upstream clients and the gateway.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Placeholder for any maintenance log field the CMS did not return.
pub const NOT_AVAILABLE: &str = "N/A";

/// A maintenance log entry in the flat shape callers see.
///
/// The CMS owns these records; the gateway only reshapes them in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceLogEntry {
    /// CMS record id, `null` when the CMS did not supply one.
    pub id: Option<i64>,
    /// ISO date of the maintenance work.
    pub date: String,
    /// Track zone identifier.
    pub zone: String,
    /// Free-text description of the work or defect.
    pub description: String,
    /// Engineer responsible.
    pub engineer: String,
}

/// Flat log fields as sent by callers on create and update.
///
/// Every field is optional so partial updates pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engineer: Option<String>,
}

impl LogFields {
    /// Look up a field by its wire name.
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "date" => self.date.as_deref(),
            "zone" => self.zone.as_deref(),
            "description" => self.description.as_deref(),
            "engineer" => self.engineer.as_deref(),
            _ => None,
        }
    }
}

/// Role of a chat message author.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message of a chat exchange.
///
/// A missing or `null` content reads as empty, so a dashboard turn that
/// recorded no reply is still forwarded in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Severity of an alert raised by the inference engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Classify a severity label case-insensitively; anything unrecognised is `Unknown`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
            Some("high") => Self::High,
            Some("medium") => Self::Medium,
            Some("low") => Self::Low,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_entry_serializes_null_id() {
        let entry = MaintenanceLogEntry {
            id: None,
            date: NOT_AVAILABLE.into(),
            zone: "A1".into(),
            description: "crack".into(),
            engineer: "J.Doe".into(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json["id"].is_null());
        assert_eq!(json["date"], "N/A");
    }

    #[test]
    fn log_fields_skip_absent_fields() {
        let fields = LogFields {
            zone: Some("B2".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"zone":"B2"}"#);
    }

    #[test]
    fn log_fields_get_by_name() {
        let fields: LogFields =
            serde_json::from_str(r#"{"date":"2024-01-01","engineer":"J.Doe"}"#).unwrap();
        assert_eq!(fields.get("date"), Some("2024-01-01"));
        assert_eq!(fields.get("engineer"), Some("J.Doe"));
        assert_eq!(fields.get("zone"), None);
        assert_eq!(fields.get("bogus"), None);
    }

    #[test]
    fn chat_message_without_content_reads_as_empty() {
        let missing: ChatMessage = serde_json::from_str(r#"{"role":"assistant"}"#).unwrap();
        assert_eq!(missing.content, "");
        let null: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":null}"#).unwrap();
        assert_eq!(null.content, "");
        assert!(serde_json::from_str::<ChatMessage>(r#"{"role":"user","content":7}"#).is_err());
    }

    #[test]
    fn chat_role_wire_names() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(msg.role, ChatRole::Assistant);
        assert_eq!(
            serde_json::to_string(&ChatMessage::system("be brief")).unwrap(),
            r#"{"role":"system","content":"be brief"}"#
        );
    }

    #[test]
    fn chat_role_rejects_unknown() {
        assert!(serde_json::from_str::<ChatMessage>(r#"{"role":"tool","content":"x"}"#).is_err());
    }

    #[test]
    fn severity_is_case_insensitive() {
        assert_eq!(Severity::from_label(Some("High")), Severity::High);
        assert_eq!(Severity::from_label(Some(" medium ")), Severity::Medium);
        assert_eq!(Severity::from_label(Some("LOW")), Severity::Low);
        assert_eq!(Severity::from_label(Some("critical")), Severity::Unknown);
        assert_eq!(Severity::from_label(None), Severity::Unknown);
        assert_eq!(Severity::High.to_string(), "high");
    }
}
