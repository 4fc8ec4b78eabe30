//! Tests for `ChatCompletionsClient` against a local stand-in for the
//! hosted chat-completions service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::{Value, json};

use careplan_core::generator::{
    ChatCompletionsClient, GenerateError, GeneratorConfig, PlanGenerator,
};
use careplan_core::plan::generate_plan;
use careplan_test_utils::noisy_generator_output;

// -----------------------------------------------------------------------
// Mock service
// -----------------------------------------------------------------------

/// One canned reply: status code and JSON body.
#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: Value,
}

impl Reply {
    fn content(text: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: json!({ "choices": [{ "message": { "role": "assistant", "content": text } }] }),
        }
    }

    fn status(status: StatusCode) -> Self {
        Self {
            status,
            body: json!({ "error": { "message": "scripted failure" } }),
        }
    }
}

#[derive(Clone)]
struct MockState {
    replies: Arc<Vec<Reply>>,
    hits: Arc<AtomicUsize>,
    requests: Arc<std::sync::Mutex<Vec<(Option<String>, Value)>>>,
}

async fn chat_handler(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    let n = state.hits.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push((auth, request));

    // The last reply repeats once the script runs out.
    let reply = state.replies[n.min(state.replies.len() - 1)].clone();
    (reply.status, Json(reply.body)).into_response()
}

struct MockServer {
    url: String,
    state: MockState,
}

impl MockServer {
    async fn start(replies: Vec<Reply>) -> Self {
        let state = MockState {
            replies: Arc::new(replies),
            hits: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(std::sync::Mutex::new(Vec::new())),
        };
        let app = Router::new()
            .route("/v1/chat/completions", post(chat_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/v1/chat/completions"),
            state,
        }
    }

    fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    fn requests(&self) -> Vec<(Option<String>, Value)> {
        self.state.requests.lock().unwrap().clone()
    }

    fn client(&self) -> ChatCompletionsClient {
        ChatCompletionsClient::new(GeneratorConfig {
            base_url: self.url.clone(),
            api_key: Some("test-key".into()),
            retry_backoff: Duration::ZERO,
            timeout: Duration::from_secs(5),
            ..GeneratorConfig::default()
        })
        .unwrap()
    }
}

// -----------------------------------------------------------------------
// Generation
// -----------------------------------------------------------------------

#[tokio::test]
async fn generate_sends_prompts_and_returns_content() {
    let server = MockServer::start(vec![Reply::content("Day 1 plan text")]).await;
    let client = server.client();

    let text = client.generate("Age: 90\nBP: 160/100").await.unwrap();

    assert_eq!(text, "Day 1 plan text");
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(body["model"], GeneratorConfig::DEFAULT_MODEL);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.contains("BP: 160/100"));
}

#[tokio::test]
async fn server_error_is_retried_until_success() {
    let server = MockServer::start(vec![
        Reply::status(StatusCode::INTERNAL_SERVER_ERROR),
        Reply::status(StatusCode::TOO_MANY_REQUESTS),
        Reply::content("recovered"),
    ])
    .await;

    let text = server.client().generate("report").await.unwrap();

    assert_eq!(text, "recovered");
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn retries_stop_after_configured_attempts() {
    let server = MockServer::start(vec![Reply::status(StatusCode::BAD_GATEWAY)]).await;

    let err = server.client().generate("report").await.unwrap_err();

    assert!(matches!(err, GenerateError::Api { status: 502, .. }));
    assert_eq!(server.hits(), GeneratorConfig::DEFAULT_MAX_RETRIES as usize + 1);
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start(vec![Reply::status(StatusCode::BAD_REQUEST)]).await;

    let err = server.client().generate("report").await.unwrap_err();

    match err {
        GenerateError::Api { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("scripted failure"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn empty_choices_is_missing_content() {
    let server = MockServer::start(vec![Reply {
        status: StatusCode::OK,
        body: json!({ "choices": [] }),
    }])
    .await;

    let err = server.client().generate("report").await.unwrap_err();

    assert!(matches!(err, GenerateError::MissingContent));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn hosted_output_flows_through_processing() {
    let server = MockServer::start(vec![Reply::content(&noisy_generator_output())]).await;
    let client = server.client();

    let plan = generate_plan(&client, "report").await.unwrap();

    assert!(plan.text.starts_with("7-Day Care Plan"));
    assert!(plan.days.get("Day 7").is_some());
}

// -----------------------------------------------------------------------
// Probe
// -----------------------------------------------------------------------

#[tokio::test]
async fn probe_reports_reachable_service() {
    let server = MockServer::start(vec![Reply::content("ok")]).await;

    assert!(server.client().probe(GeneratorConfig::DEFAULT_PROBE_MODEL).await);

    let (_, body) = &server.requests()[0];
    assert_eq!(body["model"], GeneratorConfig::DEFAULT_PROBE_MODEL);
    assert_eq!(body["max_tokens"], 1);
    assert_eq!(body["messages"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn probe_reports_failure_without_retrying() {
    let server = MockServer::start(vec![Reply::status(StatusCode::UNAUTHORIZED)]).await;

    assert!(!server.client().probe("any-model").await);
    assert_eq!(server.hits(), 1);
}
