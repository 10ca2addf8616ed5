// ABOUTME: Route module organization for the tool server HTTP surfaces
// ABOUTME: Each surface adapter translates its envelope to and from a tool invocation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the analytics tools server
//!
//! Every surface adapter is a thin translation layer: parse the wire
//! envelope into a [`ToolInvocation`](crate::tools::ToolInvocation), hand it
//! to the dispatcher, and render the [`ToolResult`](crate::tools::ToolResult)
//! in the surface's own shape. Invocation routes sit behind the API key gate;
//! discovery routes are always public.
//!
//! Surfaces are conditionally compiled based on feature flags.

use std::sync::Arc;

use axum::{body::Bytes, middleware, Router};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::middleware::require_api_key;
use crate::resources::ServerResources;

// ═══════════════════════════════════════════════════════════════
// ALWAYS ENABLED - Core infrastructure
// ═══════════════════════════════════════════════════════════════

/// Health check routes
pub mod health;

// ═══════════════════════════════════════════════════════════════
// PROTOCOL FEATURES
// ═══════════════════════════════════════════════════════════════

/// Plain tool listing and execute routes
#[cfg(feature = "protocol-plain")]
pub mod plain;

/// MCP-style tools/call routes
#[cfg(feature = "protocol-mcp")]
pub mod mcp;

/// OpenAI function routes
#[cfg(feature = "protocol-openai")]
pub mod openai;

/// OpenAI plugin manifest and `OpenAPI` document routes
#[cfg(feature = "protocol-openai")]
pub mod plugin;

// ═══════════════════════════════════════════════════════════════
// RE-EXPORTS
// ═══════════════════════════════════════════════════════════════

/// Health check route handlers
pub use health::HealthRoutes;

#[cfg(feature = "protocol-plain")]
pub use plain::PlainToolRoutes;

#[cfg(feature = "protocol-mcp")]
pub use mcp::McpRoutes;

#[cfg(feature = "protocol-openai")]
pub use openai::OpenAiRoutes;

#[cfg(feature = "protocol-openai")]
pub use plugin::PluginRoutes;

// ═══════════════════════════════════════════════════════════════
// SHARED HELPERS
// ═══════════════════════════════════════════════════════════════

/// Put invocation routes behind the API key gate
pub(crate) fn gated<S>(router: Router<S>, resources: &Arc<ServerResources>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(
        Arc::clone(&resources.security),
        require_api_key,
    ))
}

/// Parse a request body leniently: an empty body is `null`
///
/// Bodies are read as raw bytes so malformed JSON produces the surface's own
/// error envelope instead of the framework's plain-text rejection.
pub(crate) fn parse_json_body(body: &Bytes) -> AppResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::invalid_arguments(format!("Request body is not valid JSON: {e}")))
}

/// Decode a parsed body into an envelope type; `null` decodes as the default envelope
pub(crate) fn decode_envelope<T>(body: Value) -> AppResult<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if body.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(body)
        .map_err(|e| AppError::invalid_arguments(format!("Malformed request envelope: {e}")))
}
