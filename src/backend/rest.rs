// ABOUTME: PostgREST-compatible HTTPS client for the hosted table store
// ABOUTME: Translates count/select/update/delete into REST calls with column filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! REST Backend Client
//!
//! Talks to a hosted `PostgREST` endpoint (`{base_url}/rest/v1/{table}`).
//! Filters are encoded as `column=op.value` query pairs, counts use
//! `Prefer: count=exact` and read the total from `Content-Range`, updates ask
//! for `Prefer: return=representation` so the patched row comes back.
//!
//! The service key is sent both as the `apikey` header and as a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_RANGE, Client, Method, RequestBuilder, Response};
use tracing::{debug, warn};

use super::{BackendClient, BackendError, BackendResult, Filter, Row, SelectQuery};

/// REST backend configuration
#[derive(Debug, Clone)]
pub struct RestBackendConfig {
    /// Project base URL, e.g. `https://xyz.example.co`
    pub base_url: String,
    /// Service API key
    pub api_key: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

/// `PostgREST` client
pub struct RestBackend {
    config: RestBackendConfig,
    http_client: Client,
}

impl RestBackend {
    /// Create a new REST backend client
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed
    pub fn new(config: RestBackendConfig) -> BackendResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.http_client
            .request(method, self.table_url(table))
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    async fn ensure_success(response: Response) -> BackendResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), body = %body, "backend request rejected");
        Err(BackendError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Encode filters as `PostgREST` query pairs
fn filter_pairs(filters: &[Filter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column.clone(), format!("{}.{}", f.op, f.value_text())))
        .collect()
}

/// Encode a select query as `PostgREST` query pairs
fn select_pairs(query: &SelectQuery) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_owned(), query.projection())];
    pairs.extend(filter_pairs(&query.filters));
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        pairs.push(("order".to_owned(), format!("{}.{direction}", order.column)));
    }
    if let Some(limit) = query.limit {
        pairs.push(("limit".to_owned(), limit.to_string()));
    }
    pairs
}

fn id_pair(id: &str) -> [(String, String); 1] {
    [("id".to_owned(), format!("eq.{id}"))]
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`
fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[async_trait]
impl BackendClient for RestBackend {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> BackendResult<u64> {
        let mut pairs = vec![("select".to_owned(), "*".to_owned())];
        pairs.extend(filter_pairs(filters));

        let response = self
            .request(Method::HEAD, table)
            .header("Prefer", "count=exact")
            .query(&pairs)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let header = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| BackendError::Decode("missing Content-Range header".to_owned()))?;
        let total = parse_content_range_total(header).ok_or_else(|| {
            BackendError::Decode(format!("unparseable Content-Range header: {header}"))
        })?;

        debug!(table, total, "backend count");
        Ok(total)
    }

    async fn select(&self, query: &SelectQuery) -> BackendResult<Vec<Row>> {
        let response = self
            .request(Method::GET, &query.table)
            .query(&select_pairs(query))
            .send()
            .await?;
        let rows: Vec<Row> = Self::ensure_success(response).await?.json().await?;
        debug!(table = %query.table, rows = rows.len(), "backend select");
        Ok(rows)
    }

    async fn update(&self, table: &str, id: &str, patch: &Row) -> BackendResult<Row> {
        let response = self
            .request(Method::PATCH, table)
            .header("Prefer", "return=representation")
            .query(&id_pair(id))
            .json(patch)
            .send()
            .await?;
        let rows: Vec<Row> = Self::ensure_success(response).await?.json().await?;
        rows.into_iter().next().ok_or_else(|| BackendError::NotFound {
            table: table.to_owned(),
            id: id.to_owned(),
        })
    }

    async fn delete(&self, table: &str, id: &str) -> BackendResult<()> {
        let response = self
            .request(Method::DELETE, table)
            .query(&id_pair(id))
            .send()
            .await?;
        Self::ensure_success(response).await?;
        debug!(table, id, "backend delete");
        Ok(())
    }
}
