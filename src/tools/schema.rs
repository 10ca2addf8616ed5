// ABOUTME: Recursive parameter schema used to describe and validate tool arguments
// ABOUTME: Serializes as JSON Schema and validates incoming argument objects at dispatch time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Parameter Schemas
//!
//! [`SchemaNode`] serializes directly into the JSON Schema subset every
//! surface publishes (`type`, `format`, `enum`, `description`, `properties`,
//! `required`, `items`) and doubles as the validator applied to incoming
//! arguments before they reach an operation.
//!
//! Validation checks presence of required properties, JSON types, and the
//! `date` format. `null` for an optional property counts as absent. `enum`
//! values are published for clients but membership is enforced by the typed
//! conversion that follows validation, so each tool can report its own error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{AppError, AppResult};
use crate::models::parse_iso_date;

/// JSON Schema primitive type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// JSON string
    String,
    /// Any JSON number
    Number,
    /// Integral JSON number
    Integer,
    /// JSON boolean
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
}

impl SchemaType {
    /// Lowercase JSON Schema name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }
}

/// Recursive parameter schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Value type
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    /// Optional format hint (`date`, `email`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Allowed string values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Object properties by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,
    /// Required property names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Array item schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            format: None,
            enum_values: None,
            description: None,
            properties: None,
            required: Vec::new(),
            items: None,
        }
    }

    /// String schema
    #[must_use]
    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    /// Number schema
    #[must_use]
    pub fn number() -> Self {
        Self::of(SchemaType::Number)
    }

    /// Integer schema
    #[must_use]
    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    /// Boolean schema
    #[must_use]
    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    /// Object schema with no properties yet
    #[must_use]
    pub fn object() -> Self {
        Self {
            properties: Some(BTreeMap::new()),
            ..Self::of(SchemaType::Object)
        }
    }

    /// Array schema
    #[must_use]
    pub fn array(items: Self) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// Set the format hint
    #[must_use]
    pub fn with_format(mut self, format: &str) -> Self {
        self.format = Some(format.to_owned());
        self
    }

    /// Restrict to a set of string values
    #[must_use]
    pub fn with_enum(mut self, values: &[&str]) -> Self {
        self.enum_values = Some(values.iter().map(|v| (*v).to_owned()).collect());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_owned());
        self
    }

    /// Add an object property
    #[must_use]
    pub fn with_property(mut self, name: &str, schema: Self) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(name.to_owned(), schema);
        self
    }

    /// Mark a property as required
    #[must_use]
    pub fn with_required(mut self, name: &str) -> Self {
        self.required.push(name.to_owned());
        self
    }

    /// Look up a property schema
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Self> {
        self.properties.as_ref()?.get(name)
    }

    /// Check structural invariants of the schema itself
    ///
    /// Every name in `required` must exist in `properties`, and `enum` may
    /// only appear on string schemas.
    ///
    /// # Errors
    /// Returns a configuration error naming the offending path
    pub fn check_invariants(&self, path: &str) -> AppResult<()> {
        if self.enum_values.is_some() && self.schema_type != SchemaType::String {
            return Err(AppError::config(format!(
                "{path}: enum is only supported on string schemas"
            )));
        }

        for name in &self.required {
            if self.property(name).is_none() {
                return Err(AppError::config(format!(
                    "{path}: required property '{name}' is not declared in properties"
                )));
            }
        }

        if let Some(properties) = &self.properties {
            for (name, schema) in properties {
                schema.check_invariants(&format!("{path}.{name}"))?;
            }
        }

        if let Some(items) = &self.items {
            items.check_invariants(&format!("{path}[]"))?;
        }

        Ok(())
    }

    /// Validate a value against this schema
    ///
    /// # Errors
    /// Returns `InvalidArguments` describing the first mismatch found
    pub fn validate(&self, value: &Value, path: &str) -> AppResult<()> {
        if !self.schema_type.accepts(value) {
            return Err(AppError::invalid_arguments(format!(
                "{path} must be of type {}",
                self.schema_type.as_str()
            )));
        }

        if self.format.as_deref() == Some("date") {
            if let Some(text) = value.as_str() {
                if parse_iso_date(text).is_none() {
                    return Err(AppError::invalid_arguments(format!(
                        "{path} must be a date in YYYY-MM-DD format, got '{text}'"
                    )));
                }
            }
        }

        match value {
            Value::Object(map) => self.validate_object(map, path),
            Value::Array(items) => self.items.as_ref().map_or(Ok(()), |schema| {
                items
                    .iter()
                    .enumerate()
                    .try_for_each(|(i, item)| schema.validate(item, &format!("{path}[{i}]")))
            }),
            _ => Ok(()),
        }
    }

    fn validate_object(&self, map: &serde_json::Map<String, Value>, path: &str) -> AppResult<()> {
        for name in &self.required {
            if map.get(name).is_none_or(Value::is_null) {
                return Err(AppError::invalid_arguments(format!(
                    "Missing required parameter: {name}"
                )));
            }
        }

        let Some(properties) = &self.properties else {
            return Ok(());
        };
        for (name, schema) in properties {
            match map.get(name) {
                None | Some(Value::Null) => {}
                Some(value) => schema.validate(value, &format!("{path}.{name}"))?,
            }
        }
        Ok(())
    }
}
