// ABOUTME: OpenAPI 3.0 and OpenAI plugin manifest rendering of the tool registry
// ABOUTME: Produces one POST path per tool at /functions/{name} with camelCase operation ids
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::{json, Map, Value};

use super::registry::ToolRegistry;
use crate::config::environment::ServerConfig;
use crate::constants::service_names;
use crate::errors::{AppError, AppResult};

/// `get_user_analytics` -> `getUserAnalytics`
#[must_use]
pub fn camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' || ch == '-' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "error": { "type": "string" },
                        "code": { "type": "string" }
                    },
                    "required": ["error"]
                }
            }
        }
    })
}

impl ToolRegistry {
    /// OpenAPI 3.0 document describing every tool as `POST /functions/{name}`
    ///
    /// Paths are emitted in registration order, so repeated calls yield the
    /// same document.
    #[must_use]
    pub fn describe_as_openapi(&self, base_url: &str) -> Value {
        let mut paths = Map::new();
        for descriptor in self.list_descriptors() {
            let operation = json!({
                "operationId": camel_case(&descriptor.name),
                "summary": descriptor.description,
                "requestBody": {
                    "required": !descriptor.parameter_schema.required.is_empty(),
                    "content": {
                        "application/json": { "schema": descriptor.parameter_schema }
                    }
                },
                "responses": {
                    "200": {
                        "description": "Successful response",
                        "content": {
                            "application/json": { "schema": { "type": "object" } }
                        }
                    },
                    "400": error_response("Invalid request"),
                    "401": error_response("Missing or invalid API key"),
                    "500": error_response("Operation failed")
                }
            });
            paths.insert(
                format!("/functions/{}", descriptor.name),
                json!({ "post": operation }),
            );
        }

        json!({
            "openapi": "3.0.1",
            "info": {
                "title": service_names::DISPLAY_NAME,
                "description": "Analytics and user management tools",
                "version": service_names::VERSION
            },
            "servers": [{ "url": base_url }],
            "paths": paths
        })
    }

    /// The OpenAPI document rendered as YAML
    ///
    /// # Errors
    /// Returns an internal error if YAML serialization fails
    pub fn describe_as_openapi_yaml(&self, base_url: &str) -> AppResult<String> {
        serde_yaml::to_string(&self.describe_as_openapi(base_url))
            .map_err(|e| AppError::internal(format!("Failed to render OpenAPI YAML: {e}")))
    }
}

/// OpenAI plugin manifest served at `/.well-known/ai-plugin.json`
#[must_use]
pub fn plugin_manifest(config: &ServerConfig) -> Value {
    let base = &config.public_base_url;
    let auth = if config.security.api_key.is_some() {
        json!({ "type": "service_http", "authorization_type": "bearer" })
    } else {
        json!({ "type": "none" })
    };

    json!({
        "schema_version": "v1",
        "name_for_human": service_names::DISPLAY_NAME,
        "name_for_model": "analytics_tools",
        "description_for_human": "Query user and payment analytics and manage users.",
        "description_for_model": "Tools for user counts, payment revenue and conversion statistics, and listing, updating, or deleting users. Dates use YYYY-MM-DD.",
        "auth": auth,
        "api": {
            "type": "openapi",
            "url": format!("{base}/openapi.yaml")
        },
        "logo_url": format!("{base}/logo.png"),
        "contact_email": config.plugin.contact_email,
        "legal_info_url": format!("{base}/legal")
    })
}
