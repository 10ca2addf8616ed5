// ABOUTME: Liveness endpoint reporting service identity, version, and uptime
// ABOUTME: Always public and independent of the backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::constants::service_names;
use crate::resources::ServerResources;

/// `GET /health` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Always `ok` while the process is serving
    pub status: &'static str,
    /// Service name
    pub service: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Backend implementation in use
    pub backend: &'static str,
    /// RFC 3339 response time
    pub timestamp: String,
    /// Seconds since startup
    pub uptime_seconds: u64,
}

/// Health check routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// `GET /health`
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "ok",
            service: service_names::ANALYTICS_TOOLS_SERVER,
            version: service_names::VERSION,
            backend: resources.dispatcher.backend_name(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            uptime_seconds: resources.started_at.elapsed().as_secs(),
        })
    }
}
