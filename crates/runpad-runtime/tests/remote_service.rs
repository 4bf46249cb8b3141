//! End-to-end tests against a local stand-in for the remote execution service.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::broadcast;

use runpad_models::{CompileRequest, ExecutionResult, RunSnapshot, NO_OUTPUT_MESSAGE};
use runpad_runtime::{
    CompilerClient, ExecutionEvent, ExecutionLifecycle, RuntimeConfig, RuntimeError,
};

async fn compile(Json(request): Json<CompileRequest>) -> Response {
    match request.code.as_str() {
        "ok" => Json(json!({ "success": true, "output": "42\n" })).into_response(),
        "compile-error" => Json(json!({
            "success": false,
            "error": "SyntaxError: invalid syntax"
        }))
        .into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_millis(300)).await;
            Json(json!({ "success": true, "output": "slow" })).into_response()
        }
        "unavailable" => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        "server-error" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Compilation failed" })),
        )
            .into_response(),
        "garbage" => (StatusCode::OK, "<html>oops</html>").into_response(),
        "empty" => Json(json!({})).into_response(),
        "echo" => Json(json!({
            "success": true,
            "output": format!("{}:{}", request.language, request.std_input),
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .into_response(),
        _ => Json(json!({ "output": "" })).into_response(),
    }
}

async fn languages() -> Json<serde_json::Value> {
    Json(json!({ "languages": ["py", "js", "cpp"] }))
}

async fn spawn_service() -> SocketAddr {
    let app = Router::new()
        .route("/api/compiler", post(compile))
        .route("/api/languages", get(languages));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config_for(addr: SocketAddr) -> RuntimeConfig {
    RuntimeConfig::new()
        .with_base_url_str(&format!("http://{}", addr))
        .unwrap()
}

async fn run(addr: SocketAddr, code: &str) -> ExecutionResult {
    let lifecycle = ExecutionLifecycle::http(config_for(addr)).unwrap();
    lifecycle.submit(RunSnapshot::new(code, "py", "")).unwrap();
    lifecycle.settled().await
}

#[tokio::test]
async fn test_successful_run() {
    let addr = spawn_service().await;
    assert_eq!(run(addr, "ok").await, ExecutionResult::succeeded("42\n"));
}

#[tokio::test]
async fn test_compile_error_reported() {
    let addr = spawn_service().await;
    assert_eq!(
        run(addr, "compile-error").await,
        ExecutionResult::failed("SyntaxError: invalid syntax")
    );
}

#[tokio::test]
async fn test_empty_output_is_success() {
    let addr = spawn_service().await;
    assert_eq!(run(addr, "anything").await, ExecutionResult::succeeded(""));
}

#[tokio::test]
async fn test_empty_payload_uses_fallback() {
    let addr = spawn_service().await;
    assert_eq!(
        run(addr, "empty").await,
        ExecutionResult::failed(NO_OUTPUT_MESSAGE)
    );
}

#[tokio::test]
async fn test_status_without_body() {
    let addr = spawn_service().await;
    assert_eq!(
        run(addr, "unavailable").await,
        ExecutionResult::failed("HTTP error 503 Service Unavailable")
    );
}

#[tokio::test]
async fn test_status_with_error_body() {
    let addr = spawn_service().await;
    assert_eq!(
        run(addr, "server-error").await,
        ExecutionResult::failed("Compilation failed")
    );
}

#[tokio::test]
async fn test_malformed_body() {
    let addr = spawn_service().await;
    let result = run(addr, "garbage").await;
    let message = result.error_message().unwrap();
    assert!(message.starts_with("malformed response"), "{}", message);
}

#[tokio::test]
async fn test_stdin_and_language_forwarded() {
    let addr = spawn_service().await;
    let lifecycle = ExecutionLifecycle::http(config_for(addr)).unwrap();

    lifecycle
        .submit(RunSnapshot::new("echo", "js", "hello"))
        .unwrap();

    assert_eq!(
        lifecycle.settled().await,
        ExecutionResult::succeeded("js:hello")
    );
}

#[tokio::test]
async fn test_unreachable_service() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = run(addr, "ok").await;
    let message = result.error_message().unwrap();
    assert!(!message.is_empty());
}

#[tokio::test]
async fn test_client_timeout() {
    let addr = spawn_service().await;
    let config = config_for(addr).with_request_timeout(Duration::from_millis(50));
    let lifecycle = ExecutionLifecycle::http(config).unwrap();

    lifecycle.submit(RunSnapshot::new("slow", "py", "")).unwrap();

    assert!(lifecycle.settled().await.error_message().is_some());
}

#[tokio::test]
async fn test_late_response_discarded_over_http() {
    let addr = spawn_service().await;
    let lifecycle = ExecutionLifecycle::http(config_for(addr)).unwrap();
    let mut events = lifecycle.events();

    let first = lifecycle.submit(RunSnapshot::new("slow", "py", "")).unwrap();
    lifecycle.submit(RunSnapshot::new("ok", "py", "")).unwrap();

    assert_eq!(
        lifecycle.settled().await,
        ExecutionResult::succeeded("42\n")
    );

    loop {
        match events.recv().await {
            Ok(ExecutionEvent::Discarded { seq }) if seq == first => break,
            Ok(_) => continue,
            Err(broadcast::error::RecvError::Lagged(_)) => continue,
            Err(e) => panic!("event channel closed: {}", e),
        }
    }
    assert_eq!(lifecycle.result(), ExecutionResult::succeeded("42\n"));
}

#[tokio::test]
async fn test_language_listing() {
    let addr = spawn_service().await;
    let client = CompilerClient::new(config_for(addr)).unwrap();

    let listing = client.languages().await.unwrap();
    assert_eq!(listing["languages"][0], "py");
}

#[tokio::test]
async fn test_language_listing_unreachable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CompilerClient::new(config_for(addr)).unwrap();
    assert!(matches!(
        client.languages().await,
        Err(RuntimeError::Transport(_))
    ));
}
