// ABOUTME: Main library entry point for the analytics tools server
// ABOUTME: Serves analytics and user management tools over plain, MCP, and OpenAI surfaces
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Analytics Tools Server
//!
//! An HTTP server exposing user analytics, payment analytics, and user
//! management to tool-calling clients. Several conventions are served side
//! by side from one process, all funnelling into the same dispatcher:
//!
//! - **Plain**: `GET /tools`, `POST /execute`
//! - **MCP**: `GET /mcp/tools`, `POST /mcp/call`
//! - **OpenAI functions**: `GET /openai/functions`, `POST /openai/execute`,
//!   `POST /functions/{toolName}`
//! - **Plugin discovery**: `/.well-known/ai-plugin.json`, `/openapi.json`,
//!   `/openapi.yaml`
//!
//! ## Architecture
//!
//! - **Backend**: query capability over the hosted table store
//! - **Tools**: registry, schemas, dispatcher, and the operations
//! - **Routes**: one thin adapter per surface
//! - **Config**: environment configuration read once at startup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use analytics_tools_server::config::environment::ServerConfig;
//! use analytics_tools_server::errors::AppResult;
//! use analytics_tools_server::resources::ServerResources;
//! use analytics_tools_server::server::AnalyticsToolsServer;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let resources = Arc::new(ServerResources::from_config(config)?);
//!     AnalyticsToolsServer::new(resources).run().await
//! }
//! ```

/// Backend data client abstraction and implementations
pub mod backend;

/// Configuration management
pub mod config;

/// Application constants
pub mod constants;

/// Unified error handling
pub mod errors;

/// Per-surface payload presentation
pub mod formatters;

/// Structured logging setup
pub mod logging;

/// HTTP middleware for request ids, API key gate, and CORS
pub mod middleware;

/// Request-scoped data models
pub mod models;

/// Shared server resources
pub mod resources;

/// HTTP surface adapters
pub mod routes;

/// Server assembly and lifecycle
pub mod server;

/// Tool registry, dispatcher, and operations
pub mod tools;
