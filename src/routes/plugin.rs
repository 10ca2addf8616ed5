// ABOUTME: OpenAI plugin manifest and OpenAPI document routes
// ABOUTME: Serves the manifest plus the same OpenAPI description as JSON and YAML
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::resources::ServerResources;
use crate::tools::openapi::plugin_manifest;

/// Plugin discovery routes, always public
pub struct PluginRoutes;

impl PluginRoutes {
    /// `/.well-known/ai-plugin.json`, `/openapi.json`, `/openapi.yaml`
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/.well-known/ai-plugin.json", get(Self::handle_manifest))
            .route("/openapi.json", get(Self::handle_openapi_json))
            .route("/openapi.yaml", get(Self::handle_openapi_yaml))
            .with_state(resources)
    }

    async fn handle_manifest(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(plugin_manifest(&resources.config))
    }

    async fn handle_openapi_json(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(
            resources
                .registry
                .describe_as_openapi(&resources.config.public_base_url),
        )
    }

    async fn handle_openapi_yaml(State(resources): State<Arc<ServerResources>>) -> Response {
        match resources
            .registry
            .describe_as_openapi_yaml(&resources.config.public_base_url)
        {
            Ok(yaml) => ([(header::CONTENT_TYPE, "application/yaml")], yaml).into_response(),
            Err(e) => e.into_response(),
        }
    }
}
