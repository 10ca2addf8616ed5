// ABOUTME: HTTP server assembly merging every enabled surface into one axum router
// ABOUTME: Applies tracing, request id, and CORS layers and runs with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Server
//!
//! One process serves every surface side by side. Route modules are merged
//! according to the enabled `protocol-*` features; the middleware stack is
//! the same for all of them.

use std::sync::Arc;

use axum::{
    http::{StatusCode, Uri},
    middleware, Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, warn, Level};

use crate::errors::{AppError, AppResult};
use crate::middleware::{request_id_middleware, setup_cors};
use crate::resources::ServerResources;
use crate::routes::HealthRoutes;

/// HTTP server exposing the tool surfaces
pub struct AnalyticsToolsServer {
    resources: Arc<ServerResources>,
}

impl AnalyticsToolsServer {
    /// Create a server around shared resources
    #[must_use]
    pub const fn new(resources: Arc<ServerResources>) -> Self {
        Self { resources }
    }

    /// Shared resources
    #[must_use]
    pub const fn resources(&self) -> &Arc<ServerResources> {
        &self.resources
    }

    /// Complete router with all enabled surfaces and middleware layers
    #[must_use]
    pub fn router(&self) -> Router {
        Self::setup_router(&self.resources)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(
                        DefaultMakeSpan::new()
                            .level(Level::INFO)
                            .include_headers(false),
                    )
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(LatencyUnit::Millis),
                    ),
            )
            .layer(middleware::from_fn(request_id_middleware))
            .layer(setup_cors(&self.resources.security))
    }

    fn setup_router(resources: &Arc<ServerResources>) -> Router {
        // ═══════════════════════════════════════════════════════════════
        // CONDITIONAL IMPORTS - Based on feature flags
        // ═══════════════════════════════════════════════════════════════

        #[cfg(feature = "protocol-mcp")]
        use crate::routes::McpRoutes;
        #[cfg(feature = "protocol-openai")]
        use crate::routes::{OpenAiRoutes, PluginRoutes};
        #[cfg(feature = "protocol-plain")]
        use crate::routes::PlainToolRoutes;

        // ═══════════════════════════════════════════════════════════════
        // HEALTH ROUTES - Always enabled
        // ═══════════════════════════════════════════════════════════════

        let app = Router::new().merge(HealthRoutes::routes(Arc::clone(resources)));

        // ═══════════════════════════════════════════════════════════════
        // PROTOCOL ROUTES
        // ═══════════════════════════════════════════════════════════════

        #[cfg(feature = "protocol-plain")]
        let app = app.merge(PlainToolRoutes::routes(Arc::clone(resources)));

        #[cfg(feature = "protocol-mcp")]
        let app = app.merge(McpRoutes::routes(Arc::clone(resources)));

        #[cfg(feature = "protocol-openai")]
        let app = app
            .merge(OpenAiRoutes::routes(Arc::clone(resources)))
            .merge(PluginRoutes::routes(Arc::clone(resources)));

        app.fallback(handle_not_found)
    }

    /// Bind the configured host and port and serve until ctrl-c
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound or the server fails
    pub async fn run(&self) -> AppResult<()> {
        let config = &self.resources.config;
        let listener = TcpListener::bind((config.host.as_str(), config.http_port))
            .await
            .map_err(|e| {
                AppError::internal(format!(
                    "Failed to bind {}:{}: {e}",
                    config.host, config.http_port
                ))
            })?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

        info!(
            %addr,
            backend = self.resources.dispatcher.backend_name(),
            tools = self.resources.registry.len(),
            api_key_gate = config.security.api_key.is_some(),
            "Analytics tools server listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| AppError::internal(format!("Transport error: {e}")))?;

        info!("Server stopped");
        Ok(())
    }
}

async fn handle_not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("No route for {uri}") })),
    )
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
