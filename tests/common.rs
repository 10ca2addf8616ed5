// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging init, seeded in-memory backends, fake backends, and router builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `analytics_tools_server`

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use analytics_tools_server::backend::memory::MemoryBackend;
use analytics_tools_server::backend::{
    BackendClient, BackendError, BackendResult, Filter, Row, SelectQuery,
};
use analytics_tools_server::config::environment::ServerConfig;
use analytics_tools_server::constants::tables::{PAYMENTS, USERS};
use analytics_tools_server::resources::ServerResources;
use analytics_tools_server::server::AnalyticsToolsServer;
use analytics_tools_server::tools::{Dispatcher, ToolRegistry};
use async_trait::async_trait;
use axum::Router;
use chrono::{Duration, SecondsFormat, Utc};
use serde_json::json;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging once per test binary
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// RFC 3339 timestamp `days` before now
pub fn days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Backend seeded with four users and three payments
///
/// Users `u1`..`u4` were created 2024-01-01T00:00:00Z, 2024-01-31T23:30:00Z,
/// 2024-02-01T00:00:00Z and 2023-12-31T23:59:59Z; `u1` and `u2` were updated
/// recently, the others long ago.
pub async fn seeded_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            USERS,
            vec![
                json!({"id": "u1", "email": "ada@example.com", "name": "Ada", "role": "admin",
                       "created_at": "2024-01-01T00:00:00Z", "updated_at": days_ago(1)}),
                json!({"id": "u2", "email": "bob@example.com", "name": "Bob", "role": "user",
                       "created_at": "2024-01-31T23:30:00Z", "updated_at": days_ago(10)}),
                json!({"id": "u3", "email": "cyd@example.com", "name": "Cyd", "role": "user",
                       "created_at": "2024-02-01T00:00:00Z", "updated_at": days_ago(45)}),
                json!({"id": "u4", "email": "dee@example.com", "name": "Dee", "role": "user",
                       "created_at": "2023-12-31T23:59:59Z", "updated_at": days_ago(400)}),
            ],
        )
        .await;
    backend
        .seed(
            PAYMENTS,
            vec![
                json!({"id": "p1", "amount": 100.0, "status": "completed", "created_at": "2024-01-05T10:00:00Z"}),
                json!({"id": "p2", "amount": 50.0, "status": "pending", "created_at": "2024-01-20T10:00:00Z"}),
                json!({"id": "p3", "amount": 25.5, "status": "completed", "created_at": "2024-03-01T10:00:00Z"}),
            ],
        )
        .await;
    backend
}

/// Dispatcher over the default registry and the given backend
pub fn dispatcher_with(backend: Arc<dyn BackendClient>) -> Dispatcher {
    let registry = Arc::new(ToolRegistry::with_default_tools().unwrap());
    Dispatcher::new(registry, backend)
}

/// Resources over the given backend and configuration
pub fn resources_with(config: ServerConfig, backend: Arc<dyn BackendClient>) -> Arc<ServerResources> {
    init_test_logging();
    Arc::new(ServerResources::new(config, backend).unwrap())
}

/// Full router (all surfaces and layers) over the given backend, no API key
pub fn router_with(backend: Arc<dyn BackendClient>) -> Router {
    AnalyticsToolsServer::new(resources_with(ServerConfig::for_memory_backend(), backend)).router()
}

/// Full router with the API key gate enabled
pub fn router_with_api_key(backend: Arc<dyn BackendClient>, api_key: &str) -> Router {
    let mut config = ServerConfig::for_memory_backend();
    config.security.api_key = Some(api_key.to_owned());
    AnalyticsToolsServer::new(resources_with(config, backend)).router()
}

/// Full router over a freshly seeded backend
pub async fn seeded_router() -> Router {
    router_with(seeded_backend().await)
}

/// Backend whose every call fails
#[derive(Debug, Default)]
pub struct FailingBackend;

fn unavailable() -> BackendError {
    BackendError::Status {
        status: 503,
        body: "backend unavailable".to_owned(),
    }
}

#[async_trait]
impl BackendClient for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn count(&self, _table: &str, _filters: &[Filter]) -> BackendResult<u64> {
        Err(unavailable())
    }

    async fn select(&self, _query: &SelectQuery) -> BackendResult<Vec<Row>> {
        Err(unavailable())
    }

    async fn update(&self, _table: &str, _id: &str, _patch: &Row) -> BackendResult<Row> {
        Err(unavailable())
    }

    async fn delete(&self, _table: &str, _id: &str) -> BackendResult<()> {
        Err(unavailable())
    }
}

/// Backend wrapper counting calls per method
#[derive(Debug, Default)]
pub struct CountingBackend {
    pub inner: MemoryBackend,
    pub counts: AtomicUsize,
    pub selects: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl CountingBackend {
    pub fn total_calls(&self) -> usize {
        self.counts.load(Ordering::SeqCst)
            + self.selects.load(Ordering::SeqCst)
            + self.updates.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendClient for CountingBackend {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> BackendResult<u64> {
        self.counts.fetch_add(1, Ordering::SeqCst);
        self.inner.count(table, filters).await
    }

    async fn select(&self, query: &SelectQuery) -> BackendResult<Vec<Row>> {
        self.selects.fetch_add(1, Ordering::SeqCst);
        self.inner.select(query).await
    }

    async fn update(&self, table: &str, id: &str, patch: &Row) -> BackendResult<Row> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(table, id, patch).await
    }

    async fn delete(&self, table: &str, id: &str) -> BackendResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(table, id).await
    }
}

