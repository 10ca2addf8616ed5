// ABOUTME: OpenAI function-calling surface with listing, execute, and per-function endpoints
// ABOUTME: Accepts arguments as an object or a JSON-encoded string and rounds rate fields
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! OpenAI function routes
//!
//! - `GET /openai/functions` - `{ functions: [{ name, description, parameters }] }`
//! - `POST /openai/execute` - `{ function_call: { name, arguments } }` or
//!   `{ name, arguments }`, answered with `{ result }` or `{ error, code }`
//! - `POST /functions/:tool_name` - body is the arguments object, answered
//!   with the bare payload or `{ error, code }`
//!
//! `arguments` may arrive as a JSON object or as a string holding JSON, which
//! is what function-calling models emit.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode_envelope, gated, parse_json_body};
use crate::errors::{AppError, AppResult};
use crate::formatters::Presentation;
use crate::resources::ServerResources;
use crate::tools::ToolInvocation;

/// Name and arguments of one function call
#[derive(Debug, Default, Deserialize)]
pub struct FunctionCall {
    /// Function name
    #[serde(default)]
    pub name: Option<String>,
    /// Arguments object or JSON-encoded string
    #[serde(default)]
    pub arguments: Value,
}

/// `POST /openai/execute` body
#[derive(Debug, Default, Deserialize)]
pub struct OpenAiExecuteRequest {
    /// Wrapped call, as emitted in a chat completion
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
    /// Bare call
    #[serde(flatten)]
    pub call: FunctionCall,
}

impl OpenAiExecuteRequest {
    /// The wrapped call when present, otherwise the bare one
    fn into_call(self) -> FunctionCall {
        self.function_call.unwrap_or(self.call)
    }
}

/// Normalize `arguments`: a string is parsed as JSON, an empty string means none
///
/// # Errors
/// Returns `InvalidArguments` when a string does not hold valid JSON
pub fn normalize_arguments(arguments: Value) -> AppResult<Value> {
    match arguments {
        Value::String(raw) if raw.trim().is_empty() => Ok(Value::Null),
        Value::String(raw) => serde_json::from_str(&raw).map_err(|e| {
            AppError::invalid_arguments(format!("Function arguments are not valid JSON: {e}"))
        }),
        other => Ok(other),
    }
}

fn failure(error: &AppError) -> Response {
    (error.http_status(), Json(error.to_body())).into_response()
}

/// OpenAI function routes
pub struct OpenAiRoutes;

impl OpenAiRoutes {
    /// Create the OpenAI surface router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let invoke = gated(
            Router::new()
                .route("/openai/execute", post(Self::handle_execute))
                .route("/functions/:tool_name", post(Self::handle_function)),
            &resources,
        );
        Router::new()
            .route("/openai/functions", get(Self::handle_list_functions))
            .merge(invoke)
            .with_state(resources)
    }

    async fn handle_list_functions(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(resources.registry.openai_functions())
    }

    async fn run(resources: &ServerResources, name: String, arguments: Value) -> AppResult<Value> {
        let arguments = normalize_arguments(arguments)?;
        resources
            .dispatcher
            .dispatch(ToolInvocation::new(name, arguments))
            .await
            .into_result()
            .map(|payload| Presentation::Rounded.apply(payload))
    }

    async fn handle_execute(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Response {
        let call = match parse_json_body(&body).and_then(decode_envelope::<OpenAiExecuteRequest>) {
            Ok(request) => request.into_call(),
            Err(e) => return failure(&e),
        };

        match Self::run(&resources, call.name.unwrap_or_default(), call.arguments).await {
            Ok(result) => Json(json!({ "result": result })).into_response(),
            Err(e) => failure(&e),
        }
    }

    async fn handle_function(
        State(resources): State<Arc<ServerResources>>,
        Path(tool_name): Path<String>,
        body: Bytes,
    ) -> Response {
        let arguments = match parse_json_body(&body) {
            Ok(arguments) => arguments,
            Err(e) => return failure(&e),
        };

        match Self::run(&resources, tool_name, arguments).await {
            Ok(payload) => Json(payload).into_response(),
            Err(e) => failure(&e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_string_arguments_are_parsed() {
        let parsed = normalize_arguments(json!("{\"action\":\"list\"}")).unwrap();
        assert_eq!(parsed, json!({ "action": "list" }));
    }

    #[test]
    fn test_empty_string_means_no_arguments() {
        assert_eq!(normalize_arguments(json!("  ")).unwrap(), Value::Null);
    }

    #[test]
    fn test_invalid_string_arguments_rejected() {
        let err = normalize_arguments(json!("{not json")).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::InvalidArguments);
    }

    #[test]
    fn test_wrapped_call_wins_over_bare_fields() {
        let request: OpenAiExecuteRequest = serde_json::from_value(json!({
            "name": "outer",
            "function_call": { "name": "get_user_analytics", "arguments": "{}" }
        }))
        .unwrap();
        assert_eq!(request.into_call().name.as_deref(), Some("get_user_analytics"));
    }
}
