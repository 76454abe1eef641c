//! OpenRouter inference delegate.
//!
//! Works with OpenRouter and any other endpoint exposing an
//! OpenAI-compatible `/chat/completions` route. The command is sent as the
//! user message next to [`SYSTEM_PROMPT`], and the first choice's content is
//! parsed into an [`Action`].
//!
//! Every failure stage maps onto its own [`InferenceError`] variant; raw
//! `reqwest` errors never leave this module.

use async_trait::async_trait;
use intentgate_core::{Action, InferenceDelegate, InferenceError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::prompt::SYSTEM_PROMPT;
use crate::reply::parse_reply;

const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// An inference delegate backed by an OpenAI-compatible chat endpoint.
pub struct OpenRouterDelegate {
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    referer: Option<String>,
    title: Option<String>,
    client: reqwest::Client,
}

impl OpenRouterDelegate {
    /// Create a delegate for an OpenAI-compatible endpoint.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            temperature: 0.1,
            max_tokens: 500,
            timeout: DEFAULT_TIMEOUT,
            referer: None,
            title: None,
            client: build_client(DEFAULT_TIMEOUT),
        }
    }

    /// Create an OpenRouter delegate (convenience constructor).
    pub fn openrouter(api_key: impl Into<String>) -> Self {
        Self::new("openrouter", "https://openrouter.ai/api/v1", api_key)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Bound each HTTP exchange; expiry is reported as `InferenceError::Timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = build_client(timeout);
        self
    }

    /// OpenRouter app attribution headers (`HTTP-Referer`, `X-Title`).
    pub fn with_attribution(mut self, referer: impl Into<String>, title: impl Into<String>) -> Self {
        self.referer = Some(referer.into()).filter(|s: &String| !s.is_empty());
        self.title = Some(title.into()).filter(|s: &String| !s.is_empty());
        self
    }

    fn request_body<'a>(&'a self, text: &'a str) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ApiMessage {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> InferenceError {
        if e.is_timeout() {
            InferenceError::Timeout {
                after: self.timeout,
            }
        } else {
            InferenceError::Network(e.to_string())
        }
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to default HTTP client");
            reqwest::Client::new()
        })
}

#[async_trait]
impl InferenceDelegate for OpenRouterDelegate {
    fn name(&self) -> &str {
        &self.name
    }

    async fn infer(&self, text: &str) -> std::result::Result<Action, InferenceError> {
        if self.api_key.trim().is_empty() {
            return Err(InferenceError::NotConfigured(format!(
                "delegate '{}' has no API key",
                self.name
            )));
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!(delegate = %self.name, model = %self.model, "Sending classification request");

        let mut request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if let Some(referer) = &self.referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            request = request.header("X-Title", title);
        }

        let response = request
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Inference provider returned error");
            return Err(InferenceError::Status { status_code: status });
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.map_send_error(e)
            } else {
                InferenceError::MalformedReply(e.to_string())
            }
        })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| InferenceError::MalformedReply("No choices in response".into()))?;

        let action = parse_reply(&content).inspect_err(|e| {
            warn!(error = %e, content = %content, "Unusable inference reply");
        })?;

        debug!(delegate = %self.name, kind = %action.kind(), "Inference reply accepted");
        Ok(action)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ApiReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use intentgate_core::{ActionKind, SchemaViolation};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    /// What the mock endpoint saw on its last request.
    #[derive(Default)]
    struct Captured {
        authorization: Option<String>,
        title: Option<String>,
        body: Option<Value>,
    }

    /// Serve `router` on an ephemeral port; returns its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// A chat endpoint that always answers with `content` as the first choice.
    async fn serve_reply(content: &str) -> (String, Arc<Mutex<Captured>>) {
        let captured = Arc::new(Mutex::new(Captured::default()));
        let reply = json!({
            "id": "gen-1",
            "model": "mock",
            "choices": [{"message": {"role": "assistant", "content": content}}]
        });
        let router = Router::new()
            .route(
                "/chat/completions",
                post(
                    move |State(captured): State<Arc<Mutex<Captured>>>,
                          headers: HeaderMap,
                          Json(body): Json<Value>| {
                        let reply = reply.clone();
                        async move {
                            let mut seen = captured.lock().unwrap();
                            seen.authorization = headers
                                .get("authorization")
                                .and_then(|v| v.to_str().ok())
                                .map(String::from);
                            seen.title = headers
                                .get("x-title")
                                .and_then(|v| v.to_str().ok())
                                .map(String::from);
                            seen.body = Some(body);
                            Json(reply)
                        }
                    },
                ),
            )
            .with_state(captured.clone());
        (serve(router).await, captured)
    }

    fn delegate(base_url: &str) -> OpenRouterDelegate {
        OpenRouterDelegate::new("mock", base_url, "sk-test")
    }

    #[test]
    fn openrouter_constructor() {
        let delegate = OpenRouterDelegate::openrouter("sk-test");
        assert_eq!(delegate.name(), "openrouter");
        assert!(delegate.base_url.contains("openrouter.ai"));
        assert_eq!(delegate.model, DEFAULT_MODEL);
    }

    #[test]
    fn base_url_trailing_slash_trimmed() {
        let delegate = OpenRouterDelegate::new("custom", "http://localhost:11434/v1/", "k");
        assert_eq!(delegate.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn request_body_shape() {
        let delegate = OpenRouterDelegate::openrouter("sk-test")
            .with_model("openai/gpt-4o-mini")
            .with_sampling(0.2, 256);
        let body = serde_json::to_value(delegate.request_body("merge dupes")).unwrap();
        assert_eq!(body["model"], "openai/gpt-4o-mini");
        assert_eq!(body["max_tokens"], 256);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "merge dupes"}));
    }

    #[test]
    fn empty_attribution_is_omitted() {
        let delegate = OpenRouterDelegate::openrouter("k").with_attribution("", "IntentGate");
        assert!(delegate.referer.is_none());
        assert_eq!(delegate.title.as_deref(), Some("IntentGate"));
    }

    #[tokio::test]
    async fn successful_reply_becomes_action() {
        let (url, captured) = serve_reply(
            r#"{"action": "FILTER_SEGMENT", "params": {"segment": "enterprise", "location": "Japan", "time_range": null}}"#,
        )
        .await;

        let action = delegate(&url)
            .with_attribution("http://localhost:5173", "IntentGate")
            .infer("Show me enterprise users from Japan")
            .await
            .unwrap();
        assert_eq!(action.kind(), ActionKind::FilterSegment);
        assert_eq!(action.params().unwrap()["location"], "Japan");

        let seen = captured.lock().unwrap();
        assert_eq!(seen.authorization.as_deref(), Some("Bearer sk-test"));
        assert_eq!(seen.title.as_deref(), Some("IntentGate"));
        let body = seen.body.as_ref().unwrap();
        assert_eq!(body["messages"][1]["content"], "Show me enterprise users from Japan");
        assert_eq!(body["model"], DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn fenced_reply_is_accepted() {
        let (url, _) =
            serve_reply("```json\n{\"action\": \"MERGE_DUPLICATES\", \"params\": {\"match_key\": \"email\"}}\n```")
                .await;
        let action = delegate(&url).infer("merge").await.unwrap();
        assert_eq!(action.kind(), ActionKind::MergeDuplicates);
    }

    #[tokio::test]
    async fn reply_outside_schema_is_rejected() {
        let (url, _) = serve_reply(r#"{"action": "WIPE_DATABASE", "params": {}}"#).await;
        let err = delegate(&url).infer("wipe").await.unwrap_err();
        assert_eq!(
            err,
            InferenceError::Schema(SchemaViolation::UnknownKind("WIPE_DATABASE".into()))
        );
    }

    #[tokio::test]
    async fn non_success_status_keeps_body_out_of_error() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::UNAUTHORIZED, "org=acme key sk-or-v1-deadbeef invalid") }),
        );
        let url = serve(router).await;

        let err = delegate(&url).infer("anything").await.unwrap_err();
        assert_eq!(err, InferenceError::Status { status_code: 401 });
        assert!(!err.to_string().contains("sk-or-v1-deadbeef"));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let router = Router::new().route("/chat/completions", post(|| async { "<html>oops</html>" }));
        let url = serve(router).await;

        let err = delegate(&url).infer("anything").await.unwrap_err();
        assert!(matches!(err, InferenceError::MalformedReply(_)));
        let message = err.to_string();
        assert_eq!(message.matches("Failed to parse response").count(), 1);
    }

    #[tokio::test]
    async fn empty_choices_is_malformed() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async { Json(json!({"choices": []})) }),
        );
        let url = serve(router).await;

        let err = delegate(&url).infer("anything").await.unwrap_err();
        assert_eq!(
            err,
            InferenceError::MalformedReply("No choices in response".into())
        );
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let router = Router::new().route(
            "/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"choices": []}))
            }),
        );
        let url = serve(router).await;

        let err = delegate(&url)
            .with_timeout(Duration::from_millis(200))
            .infer("anything")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            InferenceError::Timeout {
                after: Duration::from_millis(200)
            }
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        // Bind and drop to get a port nothing listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = delegate(&format!("http://{addr}"))
            .infer("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::Network(_)));
    }

    #[tokio::test]
    async fn blank_key_is_not_configured() {
        let err = OpenRouterDelegate::new("blank", "http://127.0.0.1:9", " ")
            .infer("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceError::NotConfigured(_)));
    }
}
