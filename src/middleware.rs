// ABOUTME: HTTP middleware for request ids, the inbound API key gate, and CORS
// ABOUTME: The API key gate wraps invocation routes only; discovery routes stay public
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use subtle::ConstantTimeEq;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::environment::SecurityConfig;
use crate::constants::headers::{X_API_KEY, X_REQUEST_ID};
use crate::errors::AppError;

// ═══════════════════════════════════════════════════════════════
// REQUEST IDS
// ═══════════════════════════════════════════════════════════════

/// Attach a request id to the current span and echo it on the response
///
/// An incoming `x-request-id` is reused; otherwise a UUID v4 is generated.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    let span = info_span!("request", request_id = %request_id);
    debug!(parent: &span, method = %request.method(), uri = %request.uri(), "Request received");

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        request
            .headers_mut()
            .insert(HeaderName::from_static(X_REQUEST_ID), value.clone());
    }

    let mut response = next.run(request).instrument(span).await;
    if let Some(value) = header_value {
        response
            .headers_mut()
            .insert(HeaderName::from_static(X_REQUEST_ID), value);
    }
    response
}

// ═══════════════════════════════════════════════════════════════
// API KEY GATE
// ═══════════════════════════════════════════════════════════════

/// Extract the presented key from `Authorization: Bearer` or `x-api-key`
fn presented_key(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|key| !key.is_empty());

    bearer
        .or_else(|| headers.get(X_API_KEY).and_then(|v| v.to_str().ok()))
        .filter(|key| !key.is_empty())
}

/// Constant-time comparison of the presented and expected keys
#[must_use]
pub fn api_key_matches(presented: &str, expected: &str) -> bool {
    presented.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Reject invocation requests without the configured API key
///
/// With no key configured every request passes.
pub async fn require_api_key(
    State(security): State<Arc<SecurityConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = security.api_key.as_deref() else {
        return next.run(request).await;
    };

    let authorized = presented_key(request.headers()).map(|key| api_key_matches(key, expected));
    match authorized {
        Some(true) => next.run(request).await,
        Some(false) => {
            warn!(uri = %request.uri(), "Rejected request with invalid API key");
            AppError::unauthorized("Invalid API key").into_response()
        }
        None => {
            warn!(uri = %request.uri(), "Rejected request without API key");
            AppError::unauthorized("Missing API key").into_response()
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// CORS
// ═══════════════════════════════════════════════════════════════

/// CORS layer for browser-based tool clients
///
/// An empty origin list allows any origin.
#[must_use]
pub fn setup_cors(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(X_API_KEY),
            HeaderName::from_static(X_REQUEST_ID),
        ])
        .expose_headers([HeaderName::from_static(X_REQUEST_ID)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(X_API_KEY, HeaderValue::from_static("xyz"));
        assert_eq!(presented_key(&headers), Some("abc"));
    }

    #[test]
    fn test_x_api_key_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9v"));
        headers.insert(X_API_KEY, HeaderValue::from_static("xyz"));
        assert_eq!(presented_key(&headers), Some("xyz"));
    }

    #[test]
    fn test_empty_bearer_falls_back_to_x_api_key() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        headers.insert(X_API_KEY, HeaderValue::from_static("xyz"));
        assert_eq!(presented_key(&headers), Some("xyz"));

        headers.remove(X_API_KEY);
        assert_eq!(presented_key(&headers), None);
    }

    #[test]
    fn test_key_comparison() {
        assert!(api_key_matches("secret", "secret"));
        assert!(!api_key_matches("secret", "secreT"));
        assert!(!api_key_matches("secret", "secret-longer"));
    }
}
