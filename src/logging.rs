// ABOUTME: Structured logging setup built on tracing-subscriber
// ABOUTME: Supports compact text or JSON output with RUST_LOG overriding the configured level
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::environment::{LogFormat, LoggingConfig};
use crate::constants::service_names;
use crate::errors::{AppError, AppResult};

/// Build the filter: `RUST_LOG` wins, otherwise the configured level
fn build_filter(config: &LoggingConfig) -> AppResult<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&config.level)
            .map_err(|e| AppError::config(format!("Invalid LOG_LEVEL '{}': {e}", config.level)))
    })
}

/// Install the global tracing subscriber
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
///
/// # Errors
/// Returns a configuration error if the log level directive does not parse
pub fn init_logging(config: &LoggingConfig) -> AppResult<()> {
    let filter = build_filter(config)?;

    let installed = match config.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_target(true)
            .try_init(),
        LogFormat::Text => fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
    };

    if installed.is_ok() {
        info!(
            service = service_names::ANALYTICS_TOOLS_SERVER,
            version = service_names::VERSION,
            format = ?config.format,
            "Logging initialized"
        );
    }
    Ok(())
}
