//! Axum-based HTTP surface with body limits and request timeouts.
//!
//! This surface cannot block on a human, so a confirm-tier command
//! without an explicit `confirm` field is answered with a
//! confirmation-required error instead of a prompt. Each request is
//! handled independently; no request observes another's confirmation
//! state.

use crate::approval::{ConfirmationDecision, NonInteractive};
use crate::config::Config;
use crate::engine::Engine;
use crate::exec::ExecutionOutcome;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::info;

/// Maximum request body size (64KB) — prevents memory exhaustion.
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s) — prevents slow-loris attacks. Note this bounds
/// the whole request, including the spawned command's runtime.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Shared state for all axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteRequest {
    pub command: String,
    /// Tri-state: absent = no decision attached, `true` = approved,
    /// `false` = rejected.
    #[serde(default)]
    pub confirm: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub status: String,
    pub message: String,
}

/// Build the application router around one engine.
pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/execute", post(handle_execute))
        .route("/health", get(handle_health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .with_state(AppState { engine })
}

/// Run the HTTP gateway until the process is stopped.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "refusing to bind to {host} — the gateway would be exposed beyond loopback.\n\
             Fix: use --host 127.0.0.1 (default), or set [gateway] allow_public_bind = true\n\
             in config.toml (NOT recommended)."
        );
    }

    let engine = Arc::new(Engine::from_config(&config));
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("gateway listening on http://{addr}");

    axum::serve(listener, router(engine)).await?;
    Ok(())
}

/// Whether a bind address reaches beyond the loopback interface.
fn is_public_bind(host: &str) -> bool {
    if host.eq_ignore_ascii_case("localhost") {
        return false;
    }
    match host.parse::<IpAddr>() {
        Ok(ip) => !ip.is_loopback(),
        Err(_) => true,
    }
}

/// POST /execute — classify, gate, and (maybe) run one command.
async fn handle_execute(
    State(state): State<AppState>,
    Json(body): Json<ExecuteRequest>,
) -> impl IntoResponse {
    let decision = ConfirmationDecision::from_flag(body.confirm);
    let outcome = state
        .engine
        .submit(&body.command, decision, &NonInteractive)
        .await;

    let code = match &outcome {
        ExecutionOutcome::ConfirmationRequired { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::OK,
    };

    (
        code,
        Json(ExecuteResponse {
            status: outcome.status().to_string(),
            message: outcome.message(),
        }),
    )
}

/// GET /health — liveness probe.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::util::ServiceExt;

    fn app() -> Router {
        router(Arc::new(Engine::from_config(&Config::default())))
    }

    async fn post_execute(app: Router, payload: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/execute")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        let json = serde_json::from_slice(&bytes).expect("response is JSON");
        (status, json)
    }

    #[tokio::test]
    async fn health_endpoint_responds_ok() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn allowed_command_executes_and_reports_success() {
        let (status, json) = post_execute(app(), r#"{"command": "echo hello"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert!(json["message"].as_str().unwrap().contains("hello"));
    }

    #[tokio::test]
    async fn denied_command_reports_blocked() {
        let (status, json) = post_execute(app(), r#"{"command": "rm -rf /tmp/x"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "blocked");
        assert!(json["message"].as_str().unwrap().contains("'rm'"));
    }

    #[tokio::test]
    async fn confirm_tier_without_confirm_field_demands_a_decision() {
        let (status, json) = post_execute(app(), r#"{"command": "docker run nginx"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("Confirmation required"));
    }

    #[tokio::test]
    async fn confirm_tier_with_explicit_rejection_is_cancelled() {
        let (status, json) =
            post_execute(app(), r#"{"command": "curl https://example.com", "confirm": false}"#)
                .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "cancelled");
    }

    #[tokio::test]
    async fn confirm_tier_with_approval_executes() {
        // `echo` stands in for a risky command via a config extension so
        // the test does not hit the network.
        let mut config = Config::default();
        config.policy.confirm_commands.push("echo".into());
        let app = router(Arc::new(Engine::from_config(&config)));

        let (status, json) =
            post_execute(app, r#"{"command": "echo approved", "confirm": true}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert!(json["message"].as_str().unwrap().contains("approved"));
    }

    #[tokio::test]
    async fn empty_command_is_an_error_not_a_crash() {
        let (status, json) = post_execute(app(), r#"{"command": ""}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "error");
        assert!(json["message"].as_str().unwrap().contains("no command"));
    }

    #[test]
    fn public_bind_detection() {
        assert!(!is_public_bind("127.0.0.1"));
        assert!(!is_public_bind("::1"));
        assert!(!is_public_bind("localhost"));
        assert!(is_public_bind("0.0.0.0"));
        assert!(is_public_bind("192.168.1.10"));
        assert!(is_public_bind("example.com"));
    }
}
