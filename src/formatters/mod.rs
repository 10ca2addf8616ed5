// ABOUTME: Presentation layer applied to tool payloads per surface before serialization
// ABOUTME: Rounds rate fields for OpenAI surfaces while plain and MCP surfaces return raw values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Payload Presentation
//!
//! Operations always return raw numbers. Some surfaces present them
//! differently: the OpenAI function surfaces round `conversionRate` to two
//! decimals because the consumer is a language model reading the value back
//! to a user.
//!
//! ## Usage
//!
//! ```rust
//! use analytics_tools_server::formatters::Presentation;
//! use serde_json::json;
//!
//! let payload = json!({ "conversionRate": 33.333_333 });
//! let shown = Presentation::Rounded.apply(payload);
//! assert_eq!(shown["conversionRate"], json!(33.33));
//! ```

use serde_json::Value;
use tracing::trace;

use crate::constants::limits::RATE_DECIMALS;

/// Payload fields rounded by [`Presentation::Rounded`]
const RATE_FIELDS: &[&str] = &["conversionRate"];

/// How a surface presents operation payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    /// Payload exactly as the operation returned it
    #[default]
    Raw,
    /// Rate fields rounded for display
    Rounded,
}

impl Presentation {
    /// Apply the presentation to a payload
    ///
    /// Only top-level numeric rate fields are touched; anything else passes
    /// through unchanged.
    #[must_use]
    pub fn apply(&self, mut payload: Value) -> Value {
        if *self == Self::Raw {
            return payload;
        }
        if let Value::Object(map) = &mut payload {
            for field in RATE_FIELDS {
                if let Some(value) = map.get_mut(*field) {
                    if let Some(raw) = value.as_f64() {
                        let rounded = round_to(raw, RATE_DECIMALS);
                        trace!(field, raw, rounded, "Rounded rate field");
                        *value = Value::from(rounded);
                    }
                }
            }
        }
        payload
    }
}

/// Round half away from zero to `decimals` places
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
