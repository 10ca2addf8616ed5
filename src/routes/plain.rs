// ABOUTME: Plain tool surface with a tool listing and a generic execute endpoint
// ABOUTME: Wraps dispatch outcomes in a success flag envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Plain tool routes
//!
//! - `GET /tools` - `{ tools: [{ name, description, parameters }] }`
//! - `POST /execute` - `{ tool, arguments }` (also `name`/`toolName` and
//!   `params`/`parameters`) answered with `{ success: true, result }` or
//!   `{ success: false, error, code }`

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{decode_envelope, gated, parse_json_body};
use crate::errors::AppError;
use crate::formatters::Presentation;
use crate::resources::ServerResources;
use crate::tools::ToolInvocation;

/// `POST /execute` body
#[derive(Debug, Default, Deserialize)]
pub struct ExecuteRequest {
    /// Tool to run
    #[serde(default, alias = "name", alias = "toolName")]
    pub tool: Option<String>,
    /// Tool arguments
    #[serde(default, alias = "params", alias = "parameters")]
    pub arguments: Value,
}

fn failure(error: &AppError) -> Response {
    (
        error.http_status(),
        Json(json!({
            "success": false,
            "error": error.message,
            "code": error.code,
        })),
    )
        .into_response()
}

/// Plain tool routes
pub struct PlainToolRoutes;

impl PlainToolRoutes {
    /// Create the plain surface router
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let invoke = gated(
            Router::new().route("/execute", post(Self::handle_execute)),
            &resources,
        );
        Router::new()
            .route("/tools", get(Self::handle_list_tools))
            .merge(invoke)
            .with_state(resources)
    }

    async fn handle_list_tools(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        Json(resources.registry.plain_listing())
    }

    async fn handle_execute(
        State(resources): State<Arc<ServerResources>>,
        body: Bytes,
    ) -> Response {
        let request = match parse_json_body(&body).and_then(decode_envelope::<ExecuteRequest>) {
            Ok(request) => request,
            Err(e) => return failure(&e),
        };

        let invocation = ToolInvocation::new(request.tool.unwrap_or_default(), request.arguments);
        match resources.dispatcher.dispatch(invocation).await.into_result() {
            Ok(payload) => Json(json!({
                "success": true,
                "result": Presentation::Raw.apply(payload),
            }))
            .into_response(),
            Err(e) => failure(&e),
        }
    }
}
