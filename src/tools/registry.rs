// ABOUTME: Tool registry holding the static descriptors of every invocable operation
// ABOUTME: Renders the descriptor list for plain, MCP, and OpenAI function discovery endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Tool Registry
//!
//! Descriptors are registered once at startup, checked for schema invariants
//! and duplicate names, and then shared immutably. Listing order is the
//! registration order.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{json, Value};

use super::schema::SchemaNode;
use crate::constants::tools;
use crate::errors::{AppError, AppResult};

/// Static metadata for one tool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    /// Unique, stable tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Schema of the arguments object
    pub parameter_schema: SchemaNode,
}

impl ToolDescriptor {
    /// Create a descriptor
    #[must_use]
    pub fn new(name: &str, description: &str, parameter_schema: SchemaNode) -> Self {
        Self {
            name: name.to_owned(),
            description: description.to_owned(),
            parameter_schema,
        }
    }

    /// `{ name, description, parameters }` entry used by the plain and OpenAI listings
    #[must_use]
    pub fn as_function(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameter_schema,
        })
    }

    /// `{ name, description, inputSchema }` entry used by the MCP listing
    #[must_use]
    pub fn as_mcp_tool(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.parameter_schema,
        })
    }
}

fn date_range_schema() -> SchemaNode {
    SchemaNode::object()
        .with_property(
            "startDate",
            SchemaNode::string()
                .with_format("date")
                .with_description("Start date (YYYY-MM-DD)"),
        )
        .with_property(
            "endDate",
            SchemaNode::string()
                .with_format("date")
                .with_description("End date (YYYY-MM-DD)"),
        )
}

/// Descriptors for the built-in analytics and user management tools
#[must_use]
pub fn default_descriptors() -> Vec<ToolDescriptor> {
    let user_data = SchemaNode::object()
        .with_description("Fields to change on update")
        .with_property("name", SchemaNode::string())
        .with_property("email", SchemaNode::string().with_format("email"))
        .with_property("role", SchemaNode::string());

    vec![
        ToolDescriptor::new(
            tools::GET_USER_ANALYTICS,
            "Get user analytics: total, active (last 30 days), and new users in a date range",
            date_range_schema(),
        ),
        ToolDescriptor::new(
            tools::GET_PAYMENT_ANALYTICS,
            "Get payment analytics: revenue, transaction counts, and conversion rate",
            date_range_schema(),
        ),
        ToolDescriptor::new(
            tools::MANAGE_USER,
            "List, update, or delete users",
            SchemaNode::object()
                .with_property(
                    "action",
                    SchemaNode::string()
                        .with_enum(&["list", "update", "delete"])
                        .with_description("Action to perform"),
                )
                .with_property(
                    "userId",
                    SchemaNode::string().with_description("User id (update and delete)"),
                )
                .with_property("data", user_data)
                .with_required("action"),
        ),
    ]
}

/// Immutable set of tool descriptors
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    descriptors: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Build a registry from descriptors
    ///
    /// # Errors
    /// Returns a configuration error when a name is empty or duplicated, or a
    /// schema lists a required property it does not declare
    pub fn new(descriptors: Vec<ToolDescriptor>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(descriptors.len());
        for (position, descriptor) in descriptors.iter().enumerate() {
            if descriptor.name.is_empty() {
                return Err(AppError::config("Tool name must not be empty"));
            }
            descriptor
                .parameter_schema
                .check_invariants(&descriptor.name)?;
            if index.insert(descriptor.name.clone(), position).is_some() {
                return Err(AppError::config(format!(
                    "Tool '{}' is registered twice",
                    descriptor.name
                )));
            }
        }
        Ok(Self { descriptors, index })
    }

    /// Registry with the built-in tools
    ///
    /// # Errors
    /// Returns a configuration error if a built-in schema is malformed
    pub fn with_default_tools() -> AppResult<Self> {
        Self::new(default_descriptors())
    }

    /// Descriptors in registration order
    #[must_use]
    pub fn list_descriptors(&self) -> &[ToolDescriptor] {
        &self.descriptors
    }

    /// Look up a descriptor by exact name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Number of registered tools
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether no tools are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// `{ tools: [{name, description, parameters}] }`
    #[must_use]
    pub fn plain_listing(&self) -> Value {
        let tools: Vec<Value> = self.descriptors.iter().map(ToolDescriptor::as_function).collect();
        json!({ "tools": tools })
    }

    /// `{ tools: [{name, description, inputSchema}] }`
    #[must_use]
    pub fn mcp_listing(&self) -> Value {
        let tools: Vec<Value> = self.descriptors.iter().map(ToolDescriptor::as_mcp_tool).collect();
        json!({ "tools": tools })
    }

    /// `{ functions: [{name, description, parameters}] }`
    #[must_use]
    pub fn openai_functions(&self) -> Value {
        let functions: Vec<Value> =
            self.descriptors.iter().map(ToolDescriptor::as_function).collect();
        json!({ "functions": functions })
    }
}
