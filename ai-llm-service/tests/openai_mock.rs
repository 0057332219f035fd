use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use ai_llm_service::{
    AiLlmError, AnswerProvider, LlmModelConfig, OpenAiService,
    error_handler::{ProviderError, ProviderErrorKind},
};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
};
use serde_json::{Value, json};

const SYSTEM: &str = "You are a helpful assistant.";

#[derive(Clone, Default)]
struct Seen {
    auth: Arc<Mutex<Option<String>>>,
    body: Arc<Mutex<Option<Value>>>,
}

async fn spawn_mock(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn service(endpoint: &str, timeout_secs: u64) -> OpenAiService {
    OpenAiService::new(LlmModelConfig {
        model: "gpt-4o".into(),
        endpoint: endpoint.into(),
        api_key: Some("sk-test".into()),
        max_tokens: None,
        temperature: None,
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
    .unwrap()
}

async fn recording_completion(
    State(seen): State<Seen>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    *seen.auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    *seen.body.lock().unwrap() = Some(body);

    Json(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "4"}, "finish_reason": "stop"}
        ]
    }))
}

#[tokio::test]
async fn returns_first_choice_and_sends_two_messages() {
    let seen = Seen::default();
    let app = Router::new()
        .route("/v1/chat/completions", post(recording_completion))
        .with_state(seen.clone());
    let endpoint = spawn_mock(app).await;
    let svc = service(&endpoint, 5);

    let answer = svc.generate(SYSTEM, "What is 2+2?", "gpt-4o-mini").await.unwrap();

    assert_eq!(answer, "4");
    assert_eq!(seen.auth.lock().unwrap().as_deref(), Some("Bearer sk-test"));
    let body = seen.body.lock().unwrap().clone().unwrap();
    assert_eq!(body["model"], "gpt-4o-mini");
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": SYSTEM},
            {"role": "user", "content": "What is 2+2?"}
        ])
    );
}

#[tokio::test]
async fn auth_failure_surfaces_upstream_message() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": {"message": "Incorrect API key provided: sk-test.", "type": "invalid_request_error"}
                })),
            )
        }),
    );
    let endpoint = spawn_mock(app).await;

    let err = service(&endpoint, 5)
        .generate(SYSTEM, "hi", "gpt-4o")
        .await
        .unwrap_err();

    match &err {
        AiLlmError::Provider(ProviderError {
            kind: ProviderErrorKind::HttpStatus(http),
        }) => {
            assert_eq!(http.status, StatusCode::UNAUTHORIZED);
            assert_eq!(http.snippet, "Incorrect API key provided: sk-test.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::OK, "definitely not json").into_response() }),
    );
    let endpoint = spawn_mock(app).await;

    let err = service(&endpoint, 5)
        .generate(SYSTEM, "hi", "gpt-4o")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AiLlmError::Provider(ProviderError {
            kind: ProviderErrorKind::Decode(_)
        })
    ));
}

#[tokio::test]
async fn empty_choices_is_reported() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    );
    let endpoint = spawn_mock(app).await;

    let err = service(&endpoint, 5)
        .generate(SYSTEM, "hi", "gpt-4o")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AiLlmError::Provider(ProviderError {
            kind: ProviderErrorKind::EmptyChoices
        })
    ));
}

#[tokio::test]
async fn slow_upstream_hits_the_timeout() {
    let app = Router::new().route(
        "/v1/chat/completions",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"choices": []}))
        }),
    );
    let endpoint = spawn_mock(app).await;

    let err = service(&endpoint, 1)
        .generate(SYSTEM, "hi", "gpt-4o")
        .await
        .unwrap_err();

    assert!(matches!(err, AiLlmError::Timeout(d) if d == Duration::from_secs(1)));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn unreachable_upstream_is_a_transport_error() {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(&format!("http://{addr}"), 5)
        .generate(SYSTEM, "hi", "gpt-4o")
        .await
        .unwrap_err();

    assert!(matches!(err, AiLlmError::HttpTransport(_)));
}
