// ABOUTME: HTTP tests for the plain, MCP, and OpenAI tool surfaces and plugin discovery
// ABOUTME: Drives the full router in-process and checks envelopes, status codes, and listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use std::sync::Arc;

use analytics_tools_server::backend::memory::MemoryBackend;
use analytics_tools_server::constants::tables::PAYMENTS;
use axum::http::StatusCode;
use axum::Router;
use common::{router_with, seeded_router, FailingBackend};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

const TOOL_NAMES: [&str; 3] = ["get_user_analytics", "get_payment_analytics", "manage_user"];

/// Two completed payments out of three, so the conversion rate is 66.666...
async fn two_of_three_router() -> Router {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .seed(
            PAYMENTS,
            vec![
                json!({"amount": 10.0, "status": "completed"}),
                json!({"amount": 20.0, "status": "completed"}),
                json!({"amount": 30.0, "status": "pending"}),
            ],
        )
        .await;
    router_with(backend)
}

fn names(entries: &Value) -> Vec<&str> {
    entries
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect()
}

// ═══════════════════════════════════════════════════════════════
// PLAIN SURFACE
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_plain_lists_tools_in_registration_order() {
    let response = AxumTestRequest::get("/tools").send(seeded_router().await).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(names(&body["tools"]), TOOL_NAMES);
    assert_eq!(body["tools"][2]["parameters"]["required"], json!(["action"]));
}

#[tokio::test]
async fn test_plain_execute_success_envelope() {
    let response = AxumTestRequest::post("/execute")
        .json(&json!({ "tool": "get_user_analytics", "arguments": {} }))
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["result"]["totalUsers"], 4);
}

#[tokio::test]
async fn test_plain_execute_accepts_field_aliases() {
    let response = AxumTestRequest::post("/execute")
        .json(&json!({ "name": "manage_user", "params": { "action": "list" } }))
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["result"]["users"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_plain_execute_keeps_raw_conversion_rate() {
    let response = AxumTestRequest::post("/execute")
        .json(&json!({ "tool": "get_payment_analytics" }))
        .send(two_of_three_router().await)
        .await;

    let body: Value = response.json();
    let rate = body["result"]["conversionRate"].as_f64().unwrap();
    assert!((rate - 200.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_plain_execute_unknown_tool_is_bad_request() {
    let response = AxumTestRequest::post("/execute")
        .json(&json!({ "tool": "nope" }))
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "UNKNOWN_TOOL");
    assert!(body["error"].as_str().unwrap().contains("nope"));
}

#[tokio::test]
async fn test_plain_execute_without_body_is_missing_tool_name() {
    let response = AxumTestRequest::post("/execute")
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "MISSING_TOOL_NAME");
}

#[tokio::test]
async fn test_plain_execute_malformed_json_is_invalid_arguments() {
    let response = AxumTestRequest::post("/execute")
        .header("content-type", "application/json")
        .raw_body("{\"tool\": ")
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_ARGUMENTS");
}

#[tokio::test]
async fn test_plain_execute_backend_failure_is_server_error() {
    let response = AxumTestRequest::post("/execute")
        .json(&json!({ "tool": "get_user_analytics" }))
        .send(router_with(Arc::new(FailingBackend)))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "OPERATION_FAILED");
}

// ═══════════════════════════════════════════════════════════════
// MCP SURFACE
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_mcp_lists_tools_with_input_schema() {
    let response = AxumTestRequest::get("/mcp/tools").send(seeded_router().await).await;

    let body: Value = response.json();
    assert_eq!(names(&body["tools"]), TOOL_NAMES);
    assert_eq!(body["tools"][0]["inputSchema"]["type"], "object");
    assert!(body["tools"][0].get("parameters").is_none());
}

#[tokio::test]
async fn test_mcp_call_returns_text_content() {
    let response = AxumTestRequest::post("/mcp/call")
        .json(&json!({ "name": "manage_user", "arguments": { "action": "list" } }))
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["isError"], false);
    assert_eq!(body["content"][0]["type"], "text");

    let payload: Value = serde_json::from_str(body["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(payload["users"][0]["id"], "u3");
}

#[tokio::test]
async fn test_mcp_call_error_sets_is_error_and_status() {
    let response = AxumTestRequest::post("/mcp/call")
        .json(&json!({ "name": "manage_user", "arguments": { "action": "update" } }))
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["isError"], true);
    assert!(body["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("userId"));
}

#[tokio::test]
async fn test_mcp_call_backend_failure() {
    let response = AxumTestRequest::post("/mcp/call")
        .json(&json!({ "name": "get_payment_analytics" }))
        .send(router_with(Arc::new(FailingBackend)))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["isError"], true);
}

// ═══════════════════════════════════════════════════════════════
// OPENAI SURFACE
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_openai_lists_functions() {
    let response = AxumTestRequest::get("/openai/functions")
        .send(seeded_router().await)
        .await;

    let body: Value = response.json();
    assert_eq!(names(&body["functions"]), TOOL_NAMES);
    assert_eq!(
        body["functions"][1]["parameters"]["properties"]["startDate"]["format"],
        "date"
    );
}

#[tokio::test]
async fn test_openai_execute_with_string_arguments_rounds_rate() {
    let response = AxumTestRequest::post("/openai/execute")
        .json(&json!({ "name": "get_payment_analytics", "arguments": "{}" }))
        .send(two_of_three_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["result"]["conversionRate"], 66.67);
    assert_eq!(body["result"]["completedTransactions"], 2);
}

#[tokio::test]
async fn test_openai_execute_accepts_wrapped_function_call() {
    let response = AxumTestRequest::post("/openai/execute")
        .json(&json!({
            "function_call": {
                "name": "manage_user",
                "arguments": "{\"action\":\"delete\",\"userId\":\"u4\"}"
            }
        }))
        .send(seeded_router().await)
        .await;

    let body: Value = response.json();
    assert_eq!(body["result"], json!({ "deleted": true }));
}

#[tokio::test]
async fn test_openai_execute_bad_argument_string() {
    let response = AxumTestRequest::post("/openai/execute")
        .json(&json!({ "name": "get_user_analytics", "arguments": "{oops" }))
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_ARGUMENTS");
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_function_route_returns_bare_payload() {
    let response = AxumTestRequest::post("/functions/get_user_analytics")
        .json(&json!({ "startDate": "2024-01-01", "endDate": "2024-01-31" }))
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["newUsers"], 2);
    assert!(body.get("result").is_none());
}

#[tokio::test]
async fn test_function_route_without_body() {
    let response = AxumTestRequest::post("/functions/list_users")
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["users"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_function_route_unknown_tool() {
    let response = AxumTestRequest::post("/functions/nope")
        .json(&json!({}))
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNKNOWN_TOOL");
}

#[tokio::test]
async fn test_function_route_rounds_rate() {
    let response = AxumTestRequest::post("/functions/get_payment_analytics")
        .json(&json!({}))
        .send(two_of_three_router().await)
        .await;

    let body: Value = response.json();
    assert_eq!(body["conversionRate"], 66.67);
}

// ═══════════════════════════════════════════════════════════════
// PLUGIN DISCOVERY
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_plugin_manifest_points_at_openapi() {
    let response = AxumTestRequest::get("/.well-known/ai-plugin.json")
        .send(seeded_router().await)
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["schema_version"], "v1");
    assert_eq!(body["auth"]["type"], "none");
    assert_eq!(body["api"]["type"], "openapi");
    assert!(body["api"]["url"]
        .as_str()
        .unwrap()
        .ends_with("/openapi.yaml"));
}

#[tokio::test]
async fn test_openapi_json_has_one_operation_per_tool() {
    let response = AxumTestRequest::get("/openapi.json")
        .send(seeded_router().await)
        .await;

    let body: Value = response.json();
    assert_eq!(body["openapi"], "3.0.1");
    let paths = body["paths"].as_object().unwrap();
    assert_eq!(paths.len(), 3);
    assert_eq!(
        paths["/functions/get_payment_analytics"]["post"]["operationId"],
        "getPaymentAnalytics"
    );
    assert_eq!(
        paths["/functions/manage_user"]["post"]["requestBody"]["content"]["application/json"]
            ["schema"]["required"],
        json!(["action"])
    );
    assert_eq!(
        paths["/functions/manage_user"]["post"]["requestBody"]["required"],
        true
    );
    assert_eq!(
        paths["/functions/get_user_analytics"]["post"]["requestBody"]["required"],
        false
    );
    assert!(paths.get("/functions/list_users").is_none());
}

#[tokio::test]
async fn test_openapi_yaml_matches_json() {
    let router = seeded_router().await;
    let json_doc: Value = AxumTestRequest::get("/openapi.json")
        .send(router.clone())
        .await
        .json();
    let response = AxumTestRequest::get("/openapi.yaml").send(router).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("application/yaml"));
    let yaml_doc: Value = serde_yaml::from_str(&response.text()).unwrap();
    assert_eq!(yaml_doc, json_doc);
}

// ═══════════════════════════════════════════════════════════════
// HEALTH, FALLBACK, AND LAYERS
// ═══════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_health_reports_backend() {
    let response = AxumTestRequest::get("/health").send(seeded_router().await).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "analytics-tools-server");
    assert_eq!(body["backend"], "memory");
    assert!(body["uptimeSeconds"].is_u64());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = AxumTestRequest::get("/nowhere").send(seeded_router().await).await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("/nowhere"));
}

#[tokio::test]
async fn test_request_id_is_generated_and_echoed() {
    let router = seeded_router().await;

    let generated = AxumTestRequest::get("/health").send(router.clone()).await;
    let id = generated.header("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());

    let echoed = AxumTestRequest::get("/health")
        .header("x-request-id", "trace-123")
        .send(router)
        .await;
    assert_eq!(echoed.header("x-request-id"), Some("trace-123"));
}

#[tokio::test]
async fn test_cors_preflight_is_answered() {
    let response = AxumTestRequest::options("/execute")
        .header("origin", "https://chat.example.com")
        .header("access-control-request-method", "POST")
        .send(seeded_router().await)
        .await;

    assert!(response.status_code().is_success());
    assert_eq!(response.header("access-control-allow-origin"), Some("*"));
}
