// ABOUTME: User and payment analytics operations over the backend data client
// ABOUTME: Computes user counts (total/active/new) and payment revenue and conversion stats
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Analytics Tools
//!
//! - [`user_analytics`] - total, active (sliding 30 day window) and new users
//! - [`payment_analytics`] - revenue and conversion over completed payments
//!
//! Both accept an optional [`DateRange`]. Range filters only apply when both
//! bounds are present.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::backend::{BackendClient, Filter, SelectQuery};
use crate::constants::limits::ACTIVE_WINDOW_DAYS;
use crate::constants::tables::{CREATED_AT, PAYMENTS, PAYMENT_COLUMNS, UPDATED_AT, USERS};
use crate::errors::{AppError, AppResult};
use crate::models::{DateRange, PaymentRecord};

// ============================================================================
// Response types
// ============================================================================

/// `get_user_analytics` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalytics {
    /// All users
    pub total_users: u64,
    /// Users modified within the active window
    pub active_users: u64,
    /// Users created inside the requested range, 0 without a full range
    pub new_users: u64,
    /// RFC 3339 time the response was assembled
    pub last_updated: String,
}

/// `get_payment_analytics` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentAnalytics {
    /// Sum of completed payment amounts
    pub total_revenue: f64,
    /// Payments in range
    pub total_transactions: u64,
    /// Completed payments in range
    pub completed_transactions: u64,
    /// Completed over total, as a percentage (unrounded)
    pub conversion_rate: f64,
    /// RFC 3339 time the response was assembled
    pub last_updated: String,
}

// ============================================================================
// Helper functions
// ============================================================================

fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// `created_at` filters for an inclusive range, empty unless both bounds are set
fn created_at_filters(range: &DateRange) -> Vec<Filter> {
    range
        .instant_bounds()
        .map(|(start, end)| {
            vec![
                Filter::gte(CREATED_AT, timestamp(start)),
                Filter::lte(CREATED_AT, timestamp(end)),
            ]
        })
        .unwrap_or_default()
}

// ============================================================================
// Operations
// ============================================================================

/// Count total, active and new users
///
/// The three counts run concurrently and the first failure aborts the call.
///
/// # Errors
/// Returns `OperationFailed` if any backend count fails
pub async fn user_analytics(
    backend: &dyn BackendClient,
    range: &DateRange,
) -> AppResult<UserAnalytics> {
    let now = Utc::now();
    let active_filters = [Filter::gte(
        UPDATED_AT,
        timestamp(now - Duration::days(ACTIVE_WINDOW_DAYS)),
    )];
    let new_filters = created_at_filters(range);

    let new_users = async {
        if new_filters.is_empty() {
            Ok(0)
        } else {
            backend.count(USERS, &new_filters).await
        }
    };

    let (total_users, active_users, new_users) = tokio::try_join!(
        backend.count(USERS, &[]),
        backend.count(USERS, &active_filters),
        new_users,
    )?;

    debug!(total_users, active_users, new_users, "Computed user analytics");

    Ok(UserAnalytics {
        total_users,
        active_users,
        new_users,
        last_updated: timestamp(Utc::now()),
    })
}

/// Aggregate payment revenue and conversion
///
/// # Errors
/// Returns `OperationFailed` if the backend select fails or returns rows
/// that are not payment records
pub async fn payment_analytics(
    backend: &dyn BackendClient,
    range: &DateRange,
) -> AppResult<PaymentAnalytics> {
    let query = SelectQuery::new(PAYMENTS)
        .columns(PAYMENT_COLUMNS)
        .filters(created_at_filters(range));
    let rows = backend.select(&query).await?;

    let payments = rows
        .into_iter()
        .map(|row| serde_json::from_value::<PaymentRecord>(Value::Object(row)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::operation_failed(format!("Malformed payment row: {e}")))?;

    let total_transactions = payments.len() as u64;
    let (completed_transactions, total_revenue) = payments
        .iter()
        .filter(|p| p.is_completed())
        .fold((0_u64, 0.0_f64), |(count, sum), p| {
            (count + 1, sum + p.amount.unwrap_or(0.0))
        });

    let conversion_rate = if total_transactions == 0 {
        0.0
    } else {
        completed_transactions as f64 / total_transactions as f64 * 100.0
    };

    debug!(
        total_transactions,
        completed_transactions, "Computed payment analytics"
    );

    Ok(PaymentAnalytics {
        total_revenue,
        total_transactions,
        completed_transactions,
        conversion_rate,
        last_updated: timestamp(Utc::now()),
    })
}
