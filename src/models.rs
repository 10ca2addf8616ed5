// ABOUTME: Request-scoped data models for analytics and user management operations
// ABOUTME: Defines backend row projections, date ranges, user patches, and user actions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::backend::Row;
use crate::constants::tables::STATUS_COMPLETED;
use crate::errors::AppError;

/// Read-only projection of a backend user row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// User id
    pub id: String,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Role label
    #[serde(default)]
    pub role: Option<String>,
    /// Creation timestamp as stored by the backend
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last-modified timestamp as stored by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Read-only projection of a backend payment row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Amount; missing amounts count as zero
    #[serde(default)]
    pub amount: Option<f64>,
    /// Payment status (`completed`, `pending`, ...)
    #[serde(default)]
    pub status: Option<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
}

impl PaymentRecord {
    /// Whether the payment counts towards revenue
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(STATUS_COMPLETED)
    }
}

/// Wire format of calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a calendar date written exactly as `YYYY-MM-DD`
///
/// chrono alone accepts unpadded fields and a leading sign, so the parsed
/// date must format back to the same text.
#[must_use]
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .filter(|date| date.format(DATE_FORMAT).to_string() == text)
}

fn deserialize_iso_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|text| {
            parse_iso_date(&text).ok_or_else(|| {
                de::Error::custom(format!("expected a YYYY-MM-DD date, got '{text}'"))
            })
        })
        .transpose()
}

/// Optional date bounds for analytics queries
///
/// Ordering is not enforced: a reversed range yields an empty result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day included
    #[serde(default, deserialize_with = "deserialize_iso_date")]
    pub start_date: Option<NaiveDate>,
    /// Last day included
    #[serde(default, deserialize_with = "deserialize_iso_date")]
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range from optional bounds
    #[must_use]
    pub const fn new(start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        Self {
            start_date,
            end_date,
        }
    }

    /// Inclusive instant bounds, only when both dates are present
    ///
    /// The start is midnight UTC of `start_date`; the end is the last
    /// microsecond of `end_date`, so rows stamped any time on the final day
    /// are included.
    #[must_use]
    pub fn instant_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let (start, end) = (self.start_date?, self.end_date?);
        let start_of_day = NaiveTime::from_hms_opt(0, 0, 0)?;
        let end_of_day = NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999)?;
        Some((
            start.and_time(start_of_day).and_utc(),
            end.and_time(end_of_day).and_utc(),
        ))
    }
}

/// Partial update applied by `manage_user` update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl UserPatch {
    /// Backend row containing only the provided fields
    #[must_use]
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        let fields = [("name", &self.name), ("email", &self.email), ("role", &self.role)];
        for (column, value) in fields {
            if let Some(v) = value {
                row.insert(column.to_owned(), Value::String(v.clone()));
            }
        }
        row
    }
}

/// `manage_user` action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// List users
    List,
    /// Patch a user
    Update,
    /// Delete a user
    Delete,
}

impl UserAction {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(Self::List),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            other => Err(AppError::unknown_action(other)),
        }
    }
}
