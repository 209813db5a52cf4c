// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up the route table, middleware, and shared upstream clients.

use std::any::Any;
use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use railwatch_config::model::{RailwatchConfig, ServerConfig};
use railwatch_core::{RailwatchError, UpstreamError};
use railwatch_upstream::{ChatClient, CmsClient, InferenceClient};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::error::{ErrorKind, GatewayError, INTERNAL};
use crate::handlers;

/// Shared state for axum request handlers.
///
/// Holds only immutable clients, so requests never contend with each other.
#[derive(Debug, Clone)]
pub struct GatewayState {
    pub inference: Arc<InferenceClient>,
    pub cms: Arc<CmsClient>,
    pub chat: Arc<ChatClient>,
}

impl GatewayState {
    /// Build every upstream client once from the loaded configuration.
    pub fn from_config(config: &RailwatchConfig) -> Result<Self, UpstreamError> {
        Ok(Self {
            inference: Arc::new(InferenceClient::new(&config.inference)?),
            cms: Arc::new(CmsClient::new(&config.cms)?),
            chat: Arc::new(ChatClient::new(&config.chat)?),
        })
    }
}

/// Build the gateway router.
///
/// Routes:
/// - GET /health
/// - GET /alerts, POST /summarize, POST /predict, POST /parse-report
/// - POST /analyze-image (multipart, limited to `max_upload_bytes`)
/// - GET|POST /logs, PUT|DELETE /logs/{id}
/// - POST /chat, POST /api/chat
pub fn build_router(state: GatewayState, config: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health))
        .route("/alerts", get(handlers::get_alerts))
        .route("/summarize", post(handlers::summarize))
        .route(
            "/analyze-image",
            post(handlers::analyze_image).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        )
        .route("/predict", post(handlers::predict))
        .route("/parse-report", post(handlers::parse_report))
        .route("/logs", get(handlers::list_logs).post(handlers::create_log))
        .route(
            "/logs/{id}",
            put(handlers::update_log).delete(handlers::delete_log),
        )
        .route("/chat", post(handlers::chat))
        .route("/api/chat", post(handlers::chat))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http());

    if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = %detail, "handler panicked");
    GatewayError::new(ErrorKind::Internal, INTERNAL).into_response()
}

/// Bind `host:port` and serve the gateway until `shutdown` resolves.
pub async fn start_server<F>(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: F,
) -> Result<(), RailwatchError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state.clone(), config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RailwatchError::Server {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!(
        addr = %addr,
        inference = state.inference.base_url(),
        cms = state.cms.base_url(),
        chat = state.chat.base_url(),
        "gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| RailwatchError::Server {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    info!("gateway stopped");
    Ok(())
}
