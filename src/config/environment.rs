// ABOUTME: Environment-based server configuration built once at startup
// ABOUTME: Parses host/port, backend credentials, API key gate, CORS origins, and logging settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Server configuration loaded from environment variables
//!
//! Configuration is read exactly once, in [`ServerConfig::from_env`], and the
//! resulting value is passed into constructors. Request handlers never look
//! at the process environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `127.0.0.1` |
//! | `HTTP_PORT` | `8081` |
//! | `PUBLIC_BASE_URL` | `http://{HOST}:{HTTP_PORT}` |
//! | `BACKEND` | `rest` (`memory` for local development) |
//! | `BACKEND_URL` / `BACKEND_API_KEY` | required for `rest` |
//! | `BACKEND_TIMEOUT_SECS` | `30` |
//! | `API_KEY` | unset (gate disabled) |
//! | `ALLOWED_ORIGINS` | unset (any origin) |
//! | `LOG_LEVEL` / `LOG_FORMAT` | `info` / `text` |
//! | `PLUGIN_CONTACT_EMAIL` | `support@example.com` |

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::defaults;
use crate::errors::{AppError, AppResult};

/// Which backend implementation to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Hosted `PostgREST` service over HTTPS
    #[default]
    Rest,
    /// In-process store (development and tests)
    Memory,
}

impl FromStr for BackendKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rest" => Ok(Self::Rest),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::config(format!(
                "Invalid backend '{other}'. Must be: rest, memory"
            ))),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rest => f.write_str("rest"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable compact lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" | "compact" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::config(format!(
                "Invalid LOG_FORMAT '{other}'. Must be: text, json"
            ))),
        }
    }
}

/// Backend connection settings
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Implementation to use
    pub kind: BackendKind,
    /// Base URL of the hosted service
    pub url: Option<String>,
    /// Service API key
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

/// Inbound API key gate and CORS settings
#[derive(Debug, Clone, Default)]
pub struct SecurityConfig {
    /// Expected API key for invocation endpoints; `None` disables the gate
    pub api_key: Option<String>,
    /// Allowed CORS origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

/// Logging settings
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_owned(),
            format: LogFormat::Text,
        }
    }
}

/// OpenAI plugin manifest settings
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Contact email published in the manifest
    pub contact_email: String,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Externally reachable base URL used in the manifest and `OpenAPI` servers
    pub public_base_url: String,
    /// Backend settings
    pub backend: BackendConfig,
    /// API key gate and CORS
    pub security: SecurityConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Plugin manifest settings
    pub plugin: PluginConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    /// Returns a configuration error if a variable is present but invalid
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    /// Returns a configuration error if a value is present but invalid
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| defaults::HOST.to_owned());
        let http_port = parse_or(get("HTTP_PORT"), "HTTP_PORT", defaults::HTTP_PORT)?;
        let public_base_url = get("PUBLIC_BASE_URL")
            .map_or_else(
                || format!("http://{host}:{http_port}"),
                |url| url.trim_end_matches('/').to_owned(),
            );

        let backend = BackendConfig {
            kind: get("BACKEND")
                .map(|v| v.parse::<BackendKind>())
                .transpose()?
                .unwrap_or_default(),
            url: get("BACKEND_URL"),
            api_key: get("BACKEND_API_KEY"),
            timeout_secs: parse_or(
                get("BACKEND_TIMEOUT_SECS"),
                "BACKEND_TIMEOUT_SECS",
                defaults::BACKEND_TIMEOUT_SECS,
            )?,
        };

        let security = SecurityConfig {
            api_key: get("API_KEY"),
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_default(),
        };

        let logging = LoggingConfig {
            level: get("LOG_LEVEL").unwrap_or_else(|| defaults::LOG_LEVEL.to_owned()),
            format: get("LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        };

        let plugin = PluginConfig {
            contact_email: get("PLUGIN_CONTACT_EMAIL")
                .unwrap_or_else(|| defaults::CONTACT_EMAIL.to_owned()),
        };

        Ok(Self {
            host,
            http_port,
            public_base_url,
            backend,
            security,
            logging,
            plugin,
        })
    }

    /// Apply command-line overrides on top of the environment
    ///
    /// A base URL derived from the old host and port follows the new ones;
    /// an explicit `PUBLIC_BASE_URL` is kept.
    pub fn apply_overrides(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
        backend: Option<BackendKind>,
    ) {
        let derived = self.public_base_url == format!("http://{}:{}", self.host, self.http_port);
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.http_port = port;
        }
        if let Some(kind) = backend {
            self.backend.kind = kind;
        }
        if derived {
            self.public_base_url = format!("http://{}:{}", self.host, self.http_port);
        }
    }

    /// Configuration for tests and local development: in-memory backend, no gate
    #[must_use]
    pub fn for_memory_backend() -> Self {
        let host = defaults::HOST.to_owned();
        let http_port = defaults::HTTP_PORT;
        Self {
            public_base_url: format!("http://{host}:{http_port}"),
            host,
            http_port,
            backend: BackendConfig {
                kind: BackendKind::Memory,
                url: None,
                api_key: None,
                timeout_secs: defaults::BACKEND_TIMEOUT_SECS,
            },
            security: SecurityConfig::default(),
            logging: LoggingConfig::default(),
            plugin: PluginConfig {
                contact_email: defaults::CONTACT_EMAIL.to_owned(),
            },
        }
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> AppResult<T> {
    value.map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|_| AppError::config(format!("Invalid value for {key}: '{raw}'")))
    })
}

/// Split a comma-separated origin list; `*` means any origin
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    if origins.iter().any(|o| o == "*") {
        Vec::new()
    } else {
        origins
    }
}
