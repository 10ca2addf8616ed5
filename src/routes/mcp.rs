// ABOUTME: MCP-style tools/list and tools/call surface over plain HTTP
// ABOUTME: Renders payloads and errors as text content blocks with an isError flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! MCP routes
//!
//! - `GET /mcp/tools` - `{ tools: [{ name, description, inputSchema }] }`
//! - `POST /mcp/call` - `{ name, arguments }` answered with
//!   `{ content: [{ type: "text", text }], isError }`
//!
//! Failures carry `isError: true` and also set the HTTP status from the
//! error code.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{decode_envelope, gated, parse_json_body};
use crate::errors::AppError;
use crate::formatters::Presentation;
use crate::resources::ServerResources;
use crate::tools::ToolInvocation;

/// `POST /mcp/call` body
#[derive(Debug, Default, Deserialize)]
pub struct McpCallRequest {
    /// Tool to run
    #[serde(default, alias = "tool")]
    pub name: Option<String>,
    /// Tool arguments
    #[serde(default)]
    pub arguments: Value,
}

/// One content block of a call result
#[derive(Debug, Clone, Serialize)]
pub struct McpContent {
    /// Always `text`
    #[serde(rename = "type")]
    pub content_type: &'static str,
    /// Serialized payload or error message
    pub text: String,
}

/// `POST /mcp/call` response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McpCallResponse {
    /// Content blocks
    pub content: Vec<McpContent>,
    /// Whether the call failed
    pub is_error: bool,
}

impl McpCallResponse {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![McpContent {
                content_type: "text",
                text,
            }],
            is_error,
        }
    }
}

fn failure(error: &AppError) -> Response {
    (
        error.http_status(),
        Json(McpCallResponse::text(error.message.clone(), true)),
    )
        .into_response()
}

/// MCP routes
pub struct McpRoutes;

impl McpRoutes {
    /// Create the MCP surface router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let invoke = gated(
            Router::new().route("/mcp/call", post(Self::handle_call)),
            &resources,
        );
        Router::new()
            .route("/mcp/tools", get(Self::handle_list_tools))
            .merge(invoke)
            .with_state(resources)
    }

    async fn handle_list_tools(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(resources.registry.mcp_listing())
    }

    async fn handle_call(State(resources): State<Arc<ServerResources>>, body: Bytes) -> Response {
        let request = match parse_json_body(&body).and_then(decode_envelope::<McpCallRequest>) {
            Ok(request) => request,
            Err(e) => return failure(&e),
        };

        let invocation = ToolInvocation::new(request.name.unwrap_or_default(), request.arguments);
        let payload = match resources.dispatcher.dispatch(invocation).await.into_result() {
            Ok(payload) => Presentation::Raw.apply(payload),
            Err(e) => return failure(&e),
        };

        match serde_json::to_string_pretty(&payload) {
            Ok(text) => (StatusCode::OK, Json(McpCallResponse::text(text, false))).into_response(),
            Err(e) => failure(&AppError::internal(format!(
                "Failed to serialize tool payload: {e}"
            ))),
        }
    }
}
