// ABOUTME: Unified error handling with stable error codes and HTTP status mapping
// ABOUTME: Defines AppError, ErrorCode, and the axum response rendering for failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! Every failure that can reach a caller is an [`AppError`] carrying an
//! [`ErrorCode`] and a human-readable message. Caller-input errors map to
//! `400`, a rejected API key maps to `401`, and everything caused by
//! downstream state (backend failures, misconfiguration) maps to `500`.

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;

/// Stable error codes surfaced to callers
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invocation did not name a tool
    MissingToolName,
    /// Invocation named a tool that is not registered
    UnknownTool,
    /// `manage_user` update/delete without a `userId`
    MissingUserId,
    /// `manage_user` with an action outside list/update/delete
    UnknownAction,
    /// Arguments do not match the tool's parameter schema
    InvalidArguments,
    /// Missing or wrong API key
    Unauthorized,
    /// Backend query or other runtime failure while running an operation
    OperationFailed,
    /// Invalid or missing configuration
    ConfigError,
    /// Unexpected internal failure
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error code
    #[must_use]
    pub const fn http_status(self) -> StatusCode {
        match self {
            Self::MissingToolName
            | Self::UnknownTool
            | Self::MissingUserId
            | Self::UnknownAction
            | Self::InvalidArguments => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::OperationFailed | Self::ConfigError | Self::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the error was caused by caller input rather than downstream state
    #[must_use]
    pub fn is_client_error(self) -> bool {
        self.http_status().is_client_error()
    }

    /// Wire name of the code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingToolName => "MISSING_TOOL_NAME",
            Self::UnknownTool => "UNKNOWN_TOOL",
            Self::MissingUserId => "MISSING_USER_ID",
            Self::UnknownAction => "UNKNOWN_ACTION",
            Self::InvalidArguments => "INVALID_ARGUMENTS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::OperationFailed => "OPERATION_FAILED",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application error with a stable code and a message
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AppError {
    /// Error classification
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

/// Result alias used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create an error with an explicit code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Invocation arrived without a tool name
    #[must_use]
    pub fn missing_tool_name() -> Self {
        Self::new(ErrorCode::MissingToolName, "Tool name is required")
    }

    /// Invocation named an unregistered tool
    #[must_use]
    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ErrorCode::UnknownTool, format!("Unknown tool: {name}"))
    }

    /// Update or delete without a user id
    #[must_use]
    pub fn missing_user_id(action: &str) -> Self {
        Self::new(
            ErrorCode::MissingUserId,
            format!("userId is required for action '{action}'"),
        )
    }

    /// Action outside the supported set
    #[must_use]
    pub fn unknown_action(action: &str) -> Self {
        Self::new(
            ErrorCode::UnknownAction,
            format!("Unknown action: {action}. Must be one of: list, update, delete"),
        )
    }

    /// Arguments rejected by schema validation
    #[must_use]
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArguments, message)
    }

    /// API key missing or wrong
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Operation failed while talking to the backend
    #[must_use]
    pub fn operation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::OperationFailed, message)
    }

    /// Configuration could not be loaded
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Unexpected internal failure
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// HTTP status for this error
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    /// JSON body used by surfaces that render a bare error object
    #[must_use]
    pub fn to_body(&self) -> serde_json::Value {
        json!({
            "error": self.message,
            "code": self.code,
        })
    }
}

impl From<BackendError> for AppError {
    fn from(error: BackendError) -> Self {
        Self::operation_failed(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self.to_body())).into_response()
    }
}
