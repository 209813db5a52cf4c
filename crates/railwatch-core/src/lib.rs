// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Railwatch gateway.
//!
//! Holds the error taxonomy for upstream failures and the flat types the
//! gateway exposes to the dashboard. Upstream clients and the gateway both
//! depend on this crate; it depends on neither.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{RailwatchError, Upstream, UpstreamError};
pub use types::{
    ChatMessage, ChatRole, LogFields, MaintenanceLogEntry, Severity, NOT_AVAILABLE,
};
