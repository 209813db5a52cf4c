// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `railwatch serve` command implementation.
//!
//! Builds the upstream clients from configuration and serves the gateway
//! until SIGINT or SIGTERM.

use railwatch_config::RailwatchConfig;
use railwatch_core::RailwatchError;
use tracing::info;

use crate::shutdown;

/// Runs the `railwatch serve` command.
pub async fn run_serve(config: RailwatchConfig) -> Result<(), RailwatchError> {
    init_tracing(&config.server.log_level);
    info!(
        version = env!("CARGO_PKG_VERSION"),
        chat_model = %config.chat.model,
        "starting railwatch gateway"
    );

    let cancel = shutdown::install_signal_handler();
    railwatch_gateway::serve(&config, async move { cancel.cancelled().await }).await
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("railwatch={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
