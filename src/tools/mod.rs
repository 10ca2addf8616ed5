// ABOUTME: Tool dispatch and schema-description layer shared by every surface adapter
// ABOUTME: Groups the registry, parameter schemas, OpenAPI rendering, dispatcher, and operations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tools
//!
//! - [`schema`] - recursive parameter schemas and argument validation
//! - [`registry`] - static tool descriptors and discovery renderings
//! - [`openapi`] - OpenAPI document and plugin manifest
//! - [`dispatcher`] - invocation routing onto typed operation calls
//! - [`implementations`] - the analytics and user management operations

/// Invocation routing and result wrapping
pub mod dispatcher;
/// Analytics and user management operations
pub mod implementations;
/// `OpenAPI` and plugin manifest rendering
pub mod openapi;
/// Tool descriptors and discovery listings
pub mod registry;
/// Parameter schemas and validation
pub mod schema;

pub use dispatcher::{Dispatcher, ToolCall, ToolInvocation, ToolResult};
pub use registry::{ToolDescriptor, ToolRegistry};
pub use schema::SchemaNode;
