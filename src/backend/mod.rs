// ABOUTME: Backend data client abstraction over the hosted table store
// ABOUTME: Defines the query capability (count/select/update/delete) shared by all backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Backend Data Client
//!
//! The analytics operations never talk to storage directly. They go through
//! [`BackendClient`], a thin query capability over a remote tabular service:
//!
//! - `count(table, filters)`
//! - `select(query)` with column projection, filters, ordering and a limit
//! - `update(table, id, patch)` returning the updated row
//! - `delete(table, id)`
//!
//! Two implementations ship with the crate: [`rest::RestBackend`] speaks the
//! `PostgREST` dialect over HTTPS, [`memory::MemoryBackend`] keeps rows in
//! process and backs the test suite and local development.

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Backend selection and construction from configuration
pub mod factory;
/// In-process table store
pub mod memory;
/// `PostgREST`-compatible HTTPS client
pub mod rest;

/// A single backend row, keyed by column name
pub type Row = Map<String, Value>;

/// Result alias for backend calls
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors raised by backend implementations
#[derive(Debug, Error)]
pub enum BackendError {
    /// Request could not be sent or the connection failed
    #[error("Backend request failed: {0}")]
    Request(String),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// Response body could not be decoded
    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    /// No row matched the requested id
    #[error("No row in '{table}' with id '{id}'")]
    NotFound {
        /// Table that was queried
        table: String,
        /// Id that matched nothing
        id: String,
    },
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Comparison operators supported in filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Column equals value
    Eq,
    /// Column is greater than or equal to value
    Gte,
    /// Column is less than or equal to value
    Lte,
}

impl FilterOp {
    /// Operator keyword in the `PostgREST` query dialect
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Gte => "gte",
            Self::Lte => "lte",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column filter applied to a query
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Column name
    pub column: String,
    /// Comparison operator
    pub op: FilterOp,
    /// Value compared against
    pub value: Value,
}

impl Filter {
    /// `column = value`
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    /// `column >= value`
    #[must_use]
    pub fn gte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Gte,
            value: value.into(),
        }
    }

    /// `column <= value`
    #[must_use]
    pub fn lte(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op: FilterOp::Lte,
            value: value.into(),
        }
    }

    /// Filter value rendered as query text (strings unquoted)
    #[must_use]
    pub fn value_text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Sort order for selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Column to sort by
    pub column: String,
    /// Ascending when true
    pub ascending: bool,
}

/// Select query: projection, filters, ordering and limit
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    /// Table to read from
    pub table: String,
    /// Columns to return; empty means all columns
    pub columns: Vec<String>,
    /// Filters combined with AND
    pub filters: Vec<Filter>,
    /// Optional ordering
    pub order: Option<Order>,
    /// Optional row cap
    pub limit: Option<usize>,
}

impl SelectQuery {
    /// Select all columns from a table
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    /// Restrict the returned columns
    #[must_use]
    pub fn columns(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| (*c).to_owned()).collect();
        self
    }

    /// Add a filter
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add several filters
    #[must_use]
    pub fn filters(mut self, filters: impl IntoIterator<Item = Filter>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Order by a column
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.into(),
            ascending,
        });
        self
    }

    /// Cap the number of rows
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Comma-separated projection, `*` when no columns were requested
    #[must_use]
    pub fn projection(&self) -> String {
        if self.columns.is_empty() {
            "*".to_owned()
        } else {
            self.columns.join(",")
        }
    }
}

/// Query capability over the hosted table store
///
/// Implementations hold no per-request state; every call is independent.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Short backend name for logs and health output
    fn name(&self) -> &'static str;

    /// Count rows matching all filters
    async fn count(&self, table: &str, filters: &[Filter]) -> BackendResult<u64>;

    /// Select rows
    async fn select(&self, query: &SelectQuery) -> BackendResult<Vec<Row>>;

    /// Apply a partial patch to the row with the given id and return it
    ///
    /// # Errors
    /// Returns [`BackendError::NotFound`] when no row has that id
    async fn update(&self, table: &str, id: &str, patch: &Row) -> BackendResult<Row>;

    /// Delete the row with the given id; deleting a missing row is not an error
    async fn delete(&self, table: &str, id: &str) -> BackendResult<()>;
}
