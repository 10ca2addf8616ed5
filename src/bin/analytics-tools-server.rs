// ABOUTME: Server binary entry point for the analytics tools HTTP server
// ABOUTME: Loads configuration from the environment, applies CLI overrides, and serves
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analytics Tools Server
//!
//! ## Usage
//!
//! ```bash
//! # Serve against the hosted backend (BACKEND_URL / BACKEND_API_KEY)
//! cargo run --bin analytics-tools-server
//!
//! # Local development with the in-memory backend
//! cargo run --bin analytics-tools-server -- --backend memory --port 9000
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use analytics_tools_server::config::environment::{BackendKind, ServerConfig};
use analytics_tools_server::errors::AppResult;
use analytics_tools_server::logging::init_logging;
use analytics_tools_server::resources::ServerResources;
use analytics_tools_server::server::AnalyticsToolsServer;

#[derive(Parser)]
#[command(
    name = "analytics-tools-server",
    about = "Analytics and user management tools over HTTP",
    long_about = "Serves analytics tools to plain, MCP, and OpenAI function-calling clients"
)]
struct Args {
    /// Interface to bind (overrides HOST)
    #[arg(long)]
    host: Option<String>,

    /// HTTP port (overrides HTTP_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Backend implementation: rest or memory (overrides BACKEND)
    #[arg(long)]
    backend: Option<BackendKind>,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_env()?;
    config.apply_overrides(args.host, args.port, args.backend);

    init_logging(&config.logging)?;
    info!(
        host = %config.host,
        port = config.http_port,
        backend = %config.backend.kind,
        "Starting analytics tools server"
    );

    let resources = Arc::new(ServerResources::from_config(config)?);
    AnalyticsToolsServer::new(resources).run().await
}
