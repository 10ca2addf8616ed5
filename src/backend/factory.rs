// ABOUTME: Backend factory selecting the REST or in-memory implementation
// ABOUTME: Builds a shared BackendClient from the server configuration at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{info, warn};

use super::memory::MemoryBackend;
use super::rest::{RestBackend, RestBackendConfig};
use super::BackendClient;
use crate::config::environment::{BackendConfig, BackendKind};
use crate::errors::{AppError, AppResult};

/// Create the backend described by the configuration
///
/// # Errors
/// Returns a configuration error if the REST backend is selected without a
/// URL or key, or if its HTTP client cannot be built
pub fn create_backend(config: &BackendConfig) -> AppResult<Arc<dyn BackendClient>> {
    match config.kind {
        BackendKind::Memory => {
            warn!("Using in-memory backend - data is not persisted");
            Ok(Arc::new(MemoryBackend::new()))
        }
        BackendKind::Rest => {
            let base_url = config
                .url
                .clone()
                .ok_or_else(|| AppError::config("BACKEND_URL is required for the rest backend"))?;
            let api_key = config.api_key.clone().ok_or_else(|| {
                AppError::config("BACKEND_API_KEY is required for the rest backend")
            })?;

            info!(url = %base_url, "Using REST backend");
            let backend = RestBackend::new(RestBackendConfig {
                base_url,
                api_key,
                timeout_secs: config.timeout_secs,
            })
            .map_err(|e| AppError::config(format!("Failed to build backend client: {e}")))?;
            Ok(Arc::new(backend))
        }
    }
}
