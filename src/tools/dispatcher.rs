// ABOUTME: Dispatcher mapping tool invocations onto typed operation calls
// ABOUTME: Resolves names and aliases, validates arguments, runs operations, and wraps outcomes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Dispatch
//!
//! Every surface adapter funnels into [`Dispatcher::dispatch`]:
//!
//! 1. the tool name is resolved (aliases first, then the registry)
//! 2. arguments are validated against the tool's parameter schema
//! 3. arguments are converted into a typed [`ToolCall`]
//! 4. the operation runs against the backend
//!
//! Failures at any step come back as a [`ToolResult`] carrying an
//! [`AppError`]; nothing is retried.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::implementations::analytics::{payment_analytics, user_analytics};
use super::implementations::users::{manage_user, ManageUserRequest};
use super::registry::ToolRegistry;
use crate::backend::BackendClient;
use crate::constants::tools;
use crate::errors::{AppError, AppResult};
use crate::models::{DateRange, UserAction};

/// A request to run a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Tool name; empty means the caller did not name one
    pub tool_name: String,
    /// Arguments object; `null` is treated as no arguments
    pub arguments: Value,
}

impl ToolInvocation {
    /// Create an invocation
    #[must_use]
    pub fn new(tool_name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
        }
    }
}

/// Outcome of a dispatch; on failure only `error` is meaningful
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Operation payload (`null` on failure)
    pub payload: Value,
    /// Failure, if any
    pub error: Option<AppError>,
}

impl ToolResult {
    /// Successful result
    #[must_use]
    pub const fn success(payload: Value) -> Self {
        Self {
            payload,
            error: None,
        }
    }

    /// Failed result
    #[must_use]
    pub const fn failure(error: AppError) -> Self {
        Self {
            payload: Value::Null,
            error: Some(error),
        }
    }

    /// Whether the dispatch failed
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Convert into a `Result`
    ///
    /// # Errors
    /// Returns the carried error when the dispatch failed
    pub fn into_result(self) -> AppResult<Value> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.payload),
        }
    }
}

/// Validated, typed arguments for one registered tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    /// `get_user_analytics`
    UserAnalytics(DateRange),
    /// `get_payment_analytics`
    PaymentAnalytics(DateRange),
    /// `manage_user`, and `list_users` through its alias
    ManageUser(ManageUserRequest),
}

impl ToolCall {
    /// Registered tool name for this call
    #[must_use]
    pub const fn tool_name(&self) -> &'static str {
        match self {
            Self::UserAnalytics(_) => tools::GET_USER_ANALYTICS,
            Self::PaymentAnalytics(_) => tools::GET_PAYMENT_ANALYTICS,
            Self::ManageUser(_) => tools::MANAGE_USER,
        }
    }

    /// Convert schema-validated arguments into a typed call
    ///
    /// # Errors
    /// Returns `InvalidArguments` if the arguments do not deserialize, or an
    /// internal error if the name has no implementation
    pub fn from_arguments(tool_name: &str, arguments: Value) -> AppResult<Self> {
        match tool_name {
            tools::GET_USER_ANALYTICS => Ok(Self::UserAnalytics(decode(tool_name, arguments)?)),
            tools::GET_PAYMENT_ANALYTICS => {
                Ok(Self::PaymentAnalytics(decode(tool_name, arguments)?))
            }
            tools::MANAGE_USER => Ok(Self::ManageUser(decode(tool_name, arguments)?)),
            other => Err(AppError::internal(format!(
                "Tool '{other}' is registered but has no implementation"
            ))),
        }
    }
}

fn decode<T: DeserializeOwned>(tool_name: &str, arguments: Value) -> AppResult<T> {
    serde_json::from_value(arguments).map_err(|e| {
        AppError::invalid_arguments(format!("Invalid arguments for {tool_name}: {e}"))
    })
}

fn to_payload<T: Serialize>(value: &T) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|e| AppError::internal(format!("Failed to serialize tool payload: {e}")))
}

/// Alias resolution: `(alias, target, pre-bound arguments)`
const ALIASES: &[(&str, &str, &[(&str, &str)])] = &[(
    tools::LIST_USERS,
    tools::MANAGE_USER,
    &[("action", UserAction::List.as_str())],
)];

/// Routes invocations to operations
///
/// Holds only immutable shared state and can be cloned freely across handlers.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    backend: Arc<dyn BackendClient>,
}

impl Dispatcher {
    /// Create a dispatcher over a registry and a backend
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>, backend: Arc<dyn BackendClient>) -> Self {
        Self { registry, backend }
    }

    /// Registry used for name resolution
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Name of the backend in use
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Run an invocation and wrap its outcome
    pub async fn dispatch(&self, invocation: ToolInvocation) -> ToolResult {
        let started = Instant::now();
        let tool = invocation.tool_name.clone();
        let outcome = match self.resolve(invocation) {
            Ok(call) => self.execute(call).await,
            Err(e) => Err(e),
        };
        let elapsed_ms = started.elapsed().as_millis();

        match outcome {
            Ok(payload) => {
                info!(tool = %tool, elapsed_ms, "Tool call succeeded");
                ToolResult::success(payload)
            }
            Err(err) if err.code.is_client_error() => {
                warn!(tool = %tool, code = %err.code, elapsed_ms, error = %err, "Tool call rejected");
                ToolResult::failure(err)
            }
            Err(err) => {
                error!(tool = %tool, code = %err.code, elapsed_ms, error = %err, "Tool call failed");
                ToolResult::failure(err)
            }
        }
    }

    /// Resolve the tool, validate its arguments, and build the typed call
    ///
    /// # Errors
    /// - `MissingToolName` when the name is empty
    /// - `UnknownTool` when neither an alias nor a registered tool matches
    /// - `InvalidArguments` when the arguments fail schema validation
    pub fn resolve(&self, invocation: ToolInvocation) -> AppResult<ToolCall> {
        if invocation.tool_name.trim().is_empty() {
            return Err(AppError::missing_tool_name());
        }

        let (name, bound) = ALIASES
            .iter()
            .find(|(alias, _, _)| *alias == invocation.tool_name)
            .map_or((invocation.tool_name.as_str(), &[][..]), |(_, target, bound)| {
                (*target, *bound)
            });

        let descriptor = self
            .registry
            .get(name)
            .ok_or_else(|| AppError::unknown_tool(&invocation.tool_name))?;

        let mut arguments = match invocation.arguments {
            Value::Null => Map::new(),
            Value::Object(map) => map,
            other => {
                return Err(AppError::invalid_arguments(format!(
                    "arguments must be a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };
        for (key, value) in bound {
            arguments.insert((*key).to_owned(), Value::from(*value));
        }
        let arguments = Value::Object(arguments);

        descriptor
            .parameter_schema
            .validate(&arguments, "arguments")?;
        ToolCall::from_arguments(&descriptor.name, arguments)
    }

    /// Run a typed call
    ///
    /// # Errors
    /// Propagates the operation's error; backend failures surface as `OperationFailed`
    pub async fn execute(&self, call: ToolCall) -> AppResult<Value> {
        let backend = self.backend.as_ref();
        match &call {
            ToolCall::UserAnalytics(range) => to_payload(&user_analytics(backend, range).await?),
            ToolCall::PaymentAnalytics(range) => {
                to_payload(&payment_analytics(backend, range).await?)
            }
            ToolCall::ManageUser(request) => to_payload(&manage_user(backend, request).await?),
        }
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
