// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Railwatch dashboard.
//!
//! One stable route table in front of three upstreams: the inference engine,
//! the maintenance-log CMS, and the chat provider. Handlers compose an
//! upstream client with either the response normalizer or the error
//! translator; image uploads go through the streaming relay.

pub mod error;
pub mod handlers;
pub mod normalize;
pub mod relay;
pub mod server;

use std::future::Future;

use railwatch_config::RailwatchConfig;
use railwatch_core::RailwatchError;

pub use error::{ErrorEnvelope, ErrorKind, GatewayError};
pub use server::{build_router, start_server, GatewayState};

/// Build the upstream clients from `config` and serve until `shutdown` resolves.
pub async fn serve<F>(config: &RailwatchConfig, shutdown: F) -> Result<(), RailwatchError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = GatewayState::from_config(config)?;
    start_server(&config.server, state, shutdown).await
}
