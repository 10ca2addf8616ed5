// ABOUTME: Configuration module organization
// ABOUTME: Exposes environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Environment-based server configuration
pub mod environment;

pub use environment::{
    BackendConfig, BackendKind, LogFormat, LoggingConfig, PluginConfig, SecurityConfig,
    ServerConfig,
};
