// ABOUTME: In-process table store implementing the backend query capability
// ABOUTME: Used by the test suite and by the local development backend mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use super::{BackendClient, BackendError, BackendResult, Filter, FilterOp, Row, SelectQuery};
use crate::models::DATE_FORMAT;

/// Table store held in memory
///
/// Timestamp columns are stored as RFC 3339 strings (or `YYYY-MM-DD` dates)
/// and compared chronologically, numbers numerically, everything else as text.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<HashMap<String, Vec<Row>>>,
}

impl MemoryBackend {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to a table, creating the table if needed
    pub async fn insert(&self, table: &str, row: Row) {
        self.tables
            .write()
            .await
            .entry(table.to_owned())
            .or_default()
            .push(row);
    }

    /// Append every JSON object in `rows`; non-object values are skipped
    pub async fn seed(&self, table: &str, rows: impl IntoIterator<Item = Value>) {
        let mut tables = self.tables.write().await;
        let entry = tables.entry(table.to_owned()).or_default();
        for row in rows {
            if let Value::Object(map) = row {
                entry.push(map);
            }
        }
    }

    /// Snapshot of a table's rows in insertion order
    pub async fn rows(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .await
            .get(table)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl BackendClient for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> BackendResult<u64> {
        let tables = self.tables.read().await;
        let count = tables
            .get(table)
            .map_or(0, |rows| rows.iter().filter(|r| matches_all(r, filters)).count());
        debug!(table, count, "memory count");
        Ok(count as u64)
    }

    async fn select(&self, query: &SelectQuery) -> BackendResult<Vec<Row>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Row> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|r| matches_all(r, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        drop(tables);

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = match (a.get(&order.column), b.get(&order.column)) {
                    (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => Ordering::Equal,
                };
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        if !query.columns.is_empty() {
            for row in &mut rows {
                row.retain(|column, _| query.columns.iter().any(|c| c == column));
            }
        }

        Ok(rows)
    }

    async fn update(&self, table: &str, id: &str, patch: &Row) -> BackendResult<Row> {
        let mut tables = self.tables.write().await;
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id_matches(r, id)))
            .ok_or_else(|| BackendError::NotFound {
                table: table.to_owned(),
                id: id.to_owned(),
            })?;

        for (column, value) in patch {
            row.insert(column.clone(), value.clone());
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: &str, id: &str) -> BackendResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            let before = rows.len();
            rows.retain(|r| !row_id_matches(r, id));
            debug!(table, id, removed = before - rows.len(), "memory delete");
        }
        Ok(())
    }
}

fn row_id_matches(row: &Row, id: &str) -> bool {
    match row.get("id") {
        Some(Value::String(s)) => s == id,
        Some(Value::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| matches(row, filter))
}

fn matches(row: &Row, filter: &Filter) -> bool {
    let Some(cell) = row.get(&filter.column) else {
        return false;
    };
    let Some(ordering) = compare_values(cell, &filter.value) else {
        return false;
    };
    match filter.op {
        FilterOp::Eq => ordering == Ordering::Equal,
        FilterOp::Gte => ordering != Ordering::Less,
        FilterOp::Lte => ordering != Ordering::Greater,
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => match (parse_instant(a), parse_instant(b)) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => Some(a.cmp(b)),
        },
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamps_compare_chronologically() {
        let a = json!("2024-01-31T23:00:00Z");
        let b = json!("2024-01-31T23:59:59.999999+00:00");
        assert_eq!(compare_values(&a, &b), Some(Ordering::Less));
        assert_eq!(
            compare_values(&json!("2024-01-01"), &json!("2024-01-01T00:00:00Z")),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_mixed_types_do_not_match() {
        assert_eq!(compare_values(&json!(1), &json!("1")), None);
    }

    #[tokio::test]
    async fn test_select_orders_limits_and_projects() {
        let backend = MemoryBackend::new();
        backend
            .seed(
                "users",
                (1..=5).map(|i| {
                    json!({
                        "id": format!("u{i}"),
                        "email": format!("u{i}@example.com"),
                        "created_at": format!("2024-01-0{i}T00:00:00Z"),
                    })
                }),
            )
            .await;

        let rows = backend
            .select(
                &SelectQuery::new("users")
                    .columns(&["id"])
                    .order_by("created_at", false)
                    .limit(2),
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], "u5");
        assert_eq!(rows[1]["id"], "u4");
        assert!(rows[0].get("email").is_none());
    }

    #[tokio::test]
    async fn test_count_applies_equality_filter() {
        let backend = MemoryBackend::new();
        for (id, status) in [("p1", "completed"), ("p2", "failed"), ("p3", "completed")] {
            let mut row = Row::new();
            row.insert("id".to_owned(), json!(id));
            row.insert("status".to_owned(), json!(status));
            backend.insert("payments", row).await;
        }

        let completed = backend
            .count("payments", &[Filter::eq("status", "completed")])
            .await
            .unwrap();
        assert_eq!(completed, 2);
        assert_eq!(backend.count("payments", &[]).await.unwrap(), 3);
        assert_eq!(backend.count("refunds", &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .update("users", "nope", &Row::new())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }
}
