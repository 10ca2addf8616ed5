// ABOUTME: Shared server resources handed to every route module
// ABOUTME: Bundles configuration, the tool registry, the dispatcher, and process start time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Instant;

use crate::backend::factory::create_backend;
use crate::backend::BackendClient;
use crate::config::environment::{SecurityConfig, ServerConfig};
use crate::errors::AppResult;
use crate::tools::{Dispatcher, ToolRegistry};

/// Immutable state shared by all handlers
pub struct ServerResources {
    /// Startup configuration
    pub config: Arc<ServerConfig>,
    /// Security settings, shared with the API key middleware
    pub security: Arc<SecurityConfig>,
    /// Registered tools
    pub registry: Arc<ToolRegistry>,
    /// Invocation router
    pub dispatcher: Dispatcher,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl ServerResources {
    /// Assemble resources around an existing backend
    ///
    /// # Errors
    /// Returns a configuration error if the built-in tool schemas are malformed
    pub fn new(config: ServerConfig, backend: Arc<dyn BackendClient>) -> AppResult<Self> {
        let registry = Arc::new(ToolRegistry::with_default_tools()?);
        let dispatcher = Dispatcher::new(Arc::clone(&registry), backend);
        Ok(Self {
            security: Arc::new(config.security.clone()),
            config: Arc::new(config),
            registry,
            dispatcher,
            started_at: Instant::now(),
        })
    }

    /// Assemble resources, building the backend from configuration
    ///
    /// # Errors
    /// Returns a configuration error if the backend cannot be created
    pub fn from_config(config: ServerConfig) -> AppResult<Self> {
        let backend = create_backend(&config.backend)?;
        Self::new(config, backend)
    }
}
