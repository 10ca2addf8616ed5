// ABOUTME: Application constants for tool names, backend tables, and default settings
// ABOUTME: Centralizes identifiers shared by the registry, dispatcher, operations, and routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service identity reported by health and manifest endpoints
pub mod service_names {
    /// Service name
    pub const ANALYTICS_TOOLS_SERVER: &str = "analytics-tools-server";
    /// Human-readable product name
    pub const DISPLAY_NAME: &str = "Analytics Tools";
    /// Crate version
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}

/// Registered tool names
pub mod tools {
    /// User counts over time
    pub const GET_USER_ANALYTICS: &str = "get_user_analytics";
    /// Payment revenue and conversion
    pub const GET_PAYMENT_ANALYTICS: &str = "get_payment_analytics";
    /// List, update, or delete users
    pub const MANAGE_USER: &str = "manage_user";
    /// Alias for `manage_user` with `action = list`
    pub const LIST_USERS: &str = "list_users";
}

/// Backend tables and columns
pub mod tables {
    /// User rows
    pub const USERS: &str = "users";
    /// Payment rows
    pub const PAYMENTS: &str = "payments";

    /// Row creation timestamp
    pub const CREATED_AT: &str = "created_at";
    /// Row last-modified timestamp
    pub const UPDATED_AT: &str = "updated_at";

    /// Columns returned by the user list
    pub const USER_LIST_COLUMNS: &[&str] = &["id", "email", "name", "created_at", "role"];
    /// Columns read for payment analytics
    pub const PAYMENT_COLUMNS: &[&str] = &["amount", "status", "created_at"];

    /// Payment status counted as revenue
    pub const STATUS_COMPLETED: &str = "completed";
}

/// Operation limits
pub mod limits {
    /// Sliding window for `activeUsers`
    pub const ACTIVE_WINDOW_DAYS: i64 = 30;
    /// Maximum rows returned by the user list
    pub const USER_LIST_LIMIT: usize = 100;
    /// Decimal places used when a surface rounds rates
    pub const RATE_DECIMALS: i32 = 2;
}

/// Configuration defaults
pub mod defaults {
    /// Bind address
    pub const HOST: &str = "127.0.0.1";
    /// HTTP port
    pub const HTTP_PORT: u16 = 8081;
    /// Backend request timeout
    pub const BACKEND_TIMEOUT_SECS: u64 = 30;
    /// Log filter
    pub const LOG_LEVEL: &str = "info";
    /// Manifest contact
    pub const CONTACT_EMAIL: &str = "support@example.com";
}

/// HTTP header names
pub mod headers {
    /// API key header accepted alongside bearer tokens
    pub const X_API_KEY: &str = "x-api-key";
    /// Request correlation id
    pub const X_REQUEST_ID: &str = "x-request-id";
}
