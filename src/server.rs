//! The relay endpoint: a single-hop forward from the storefront widget to
//! the upstream AI chat service.
//!
//! Every failure mode (bad token, empty message, timeout, non-2xx,
//! malformed body, missing reply field) is normalized into the failure
//! envelope with a generic user-facing string; the detail only reaches
//! the log. Each call is one best-effort forward: no retry, no caching,
//! no rate limiting.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::RelayError;
use crate::relay::{RelayEnvelope, RelayRequest};

/// Longest message the relay will forward, in characters
const MAX_MESSAGE_CHARS: usize = 2000;

/// What callers see when anything goes wrong; the widget substitutes its
/// own localized fallback, so this is a last resort for direct callers.
const GENERIC_FAILURE: &str = "Unable to process your message right now. Please try again.";

#[derive(Clone)]
pub struct ServerState {
    client: Client,
    upstream_url: String,
    token: Option<String>,
}

impl ServerState {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            upstream_url: config.upstream_url.clone(),
            token: config.resolved_token(),
        })
    }
}

/// Body forwarded upstream; the token never leaves the relay
#[derive(Serialize)]
struct UpstreamRequest {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn router(state: ServerState) -> Router {
    // The widget runs cross-origin from the storefront pages
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/chat", post(handle_chat))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

pub async fn run(bind: &str, state: ServerState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(%bind, upstream = %state.upstream_url, "relay endpoint listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// The envelope is the contract: always HTTP 200, success flag inside
async fn handle_chat(
    State(state): State<ServerState>,
    Json(request): Json<RelayRequest>,
) -> Json<RelayEnvelope> {
    match process(&state, request).await {
        Ok(reply) => Json(RelayEnvelope::ok(reply)),
        Err(reason) => {
            tracing::warn!(%reason, "chat request failed");
            Json(RelayEnvelope::failed(GENERIC_FAILURE))
        }
    }
}

async fn process(state: &ServerState, request: RelayRequest) -> Result<String, RelayError> {
    if let Some(expected) = &state.token {
        if request.token.as_deref() != Some(expected.as_str()) {
            return Err(RelayError::Auth);
        }
    }

    let message = sanitize_message(&request.message);
    if message.is_empty() {
        return Err(RelayError::Validation);
    }

    let upstream = UpstreamRequest {
        message,
        language: request.language,
    };

    let response = state
        .client
        .post(&state.upstream_url)
        .json(&upstream)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                RelayError::Upstream("upstream request timed out".to_string())
            } else {
                RelayError::Upstream(format!("upstream unreachable: {}", e))
            }
        })?;

    if !response.status().is_success() {
        return Err(RelayError::Upstream(format!(
            "upstream returned status {}",
            response.status()
        )));
    }

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| RelayError::Upstream(format!("malformed upstream body: {}", e)))?;

    extract_reply(&body)
        .ok_or_else(|| RelayError::Upstream("no reply field in upstream body".to_string()))
}

/// Pull the reply string out of the upstream JSON.
///
/// Canonical field is `response`; `message`, a string `data`, and nested
/// `data.response` are accepted because deployed upstream variants
/// disagree on the name.
fn extract_reply(body: &serde_json::Value) -> Option<String> {
    body.get("response")
        .and_then(|v| v.as_str())
        .or_else(|| body.get("message").and_then(|v| v.as_str()))
        .or_else(|| body.get("data").and_then(|v| v.as_str()))
        .or_else(|| {
            body.get("data")
                .and_then(|v| v.get("response"))
                .and_then(|v| v.as_str())
        })
        .map(|s| s.to_string())
}

/// Strip markup and control characters, trim, and cap the length
pub fn sanitize_message(raw: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern compiles"));

    let without_tags = tags.replace_all(raw, "");
    let cleaned: String = without_tags
        .chars()
        .filter(|c| !c.is_control() || *c == '\n')
        .take(MAX_MESSAGE_CHARS)
        .collect();

    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_strips_tags() {
        assert_eq!(
            sanitize_message("<script>alert(1)</script>hello"),
            "hello"
        );
        assert_eq!(sanitize_message("<b>bold</b> move"), "bold move");
    }

    #[test]
    fn test_sanitize_strips_control_chars_keeps_newlines() {
        assert_eq!(sanitize_message("a\u{0000}b\u{0007}c"), "abc");
        assert_eq!(sanitize_message("line one\nline two"), "line one\nline two");
    }

    #[test]
    fn test_sanitize_trims_and_caps() {
        assert_eq!(sanitize_message("  hi  "), "hi");
        assert_eq!(sanitize_message("   "), "");

        let long = "x".repeat(MAX_MESSAGE_CHARS + 500);
        assert_eq!(sanitize_message(&long).chars().count(), MAX_MESSAGE_CHARS);
    }

    #[test]
    fn test_markup_only_message_is_empty() {
        assert_eq!(sanitize_message("<div><br/></div>"), "");
    }

    #[test]
    fn test_extract_reply_canonical_field() {
        let body = json!({"response": "Hi there!"});
        assert_eq!(extract_reply(&body).as_deref(), Some("Hi there!"));
    }

    #[test]
    fn test_extract_reply_variant_fields() {
        assert_eq!(
            extract_reply(&json!({"message": "hi", "status": "success"})).as_deref(),
            Some("hi")
        );
        assert_eq!(extract_reply(&json!({"data": "hi"})).as_deref(), Some("hi"));
        assert_eq!(
            extract_reply(&json!({"data": {"response": "hi"}})).as_deref(),
            Some("hi")
        );
    }

    #[test]
    fn test_extract_reply_prefers_canonical() {
        let body = json!({"response": "canonical", "message": "variant"});
        assert_eq!(extract_reply(&body).as_deref(), Some("canonical"));
    }

    #[test]
    fn test_extract_reply_rejects_non_strings() {
        assert_eq!(extract_reply(&json!({"response": 42})), None);
        assert_eq!(extract_reply(&json!({"reply": "hi"})), None);
        assert_eq!(extract_reply(&json!({})), None);
    }

    #[tokio::test]
    async fn test_token_mismatch_is_auth_error() {
        let state = ServerState {
            client: Client::new(),
            upstream_url: "http://127.0.0.1:1/chat".to_string(),
            token: Some("expected".to_string()),
        };

        for token in [None, Some("wrong".to_string())] {
            let request = RelayRequest {
                message: "hello".to_string(),
                language: None,
                token,
            };
            let result = process(&state, request).await;
            assert!(matches!(result, Err(RelayError::Auth)));
        }
    }

    #[tokio::test]
    async fn test_empty_message_fails_before_any_upstream_call() {
        // Port 1 would error if contacted; validation must short-circuit
        let state = ServerState {
            client: Client::new(),
            upstream_url: "http://127.0.0.1:1/chat".to_string(),
            token: None,
        };

        let request = RelayRequest {
            message: "<p>   </p>".to_string(),
            language: None,
            token: None,
        };
        let result = process(&state, request).await;
        assert!(matches!(result, Err(RelayError::Validation)));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_upstream_error() {
        let state = ServerState {
            client: Client::new(),
            upstream_url: "http://127.0.0.1:1/chat".to_string(),
            token: None,
        };

        let request = RelayRequest {
            message: "hello".to_string(),
            language: Some("en".to_string()),
            token: None,
        };
        let result = process(&state, request).await;
        assert!(matches!(result, Err(RelayError::Upstream(_))));
    }

    #[test]
    fn test_failure_envelope_shape() {
        let envelope = RelayEnvelope::failed(GENERIC_FAILURE);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], json!(false));
        assert_eq!(json["error"], json!(GENERIC_FAILURE));
        assert!(json.get("data").is_none());
    }
}
