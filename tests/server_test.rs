//! Route-level tests driving the axum router in-process.

#![cfg(feature = "server")]

mod support;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use hfrelay::config::ServerConfig;
use hfrelay::server::router;
use hfrelay::service::RelayService;
use hfrelay::types::AttemptOutcome;
use serde_json::{Value, json};
use support::{ScriptedClient, loading, not_found, success, test_config};
use tower::ServiceExt;

const BOUNDARY: &str = "hfrelay-test-boundary";

fn app(client: ScriptedClient) -> (Router, Arc<ScriptedClient>) {
    let client = Arc::new(client);
    let service = RelayService::with_client(client.clone(), &test_config()).unwrap();
    (router(service, &ServerConfig::default()), client)
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(field: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.png\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/caption")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn hello_and_echo() {
    let (app, _) = app(ScriptedClient::new());

    let (status, body) = send(app.clone(), Request::get("/api").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = send(app, json_request("/api", json!({ "ping": 1 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "receivedData": { "ping": 1 } }));
}

#[tokio::test]
async fn analyze_requires_json() {
    let (app, client) = app(ScriptedClient::new());
    let req = Request::post("/api/analyze")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("summarize this"))
        .unwrap();

    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Invalid content type. Use application/json for text analysis." })
    );
    assert_eq!(client.call_count(), 0);
}

#[tokio::test]
async fn analyze_sentiment_round_trip() {
    let raw = json!([[{ "label": "POSITIVE", "score": 0.87 }, { "label": "NEGATIVE", "score": 0.13 }]]);
    let (app, _) = app(ScriptedClient::new().script("sent", [success(raw.clone())]));

    let (status, body) = send(
        app,
        json_request("/api/analyze", json!({ "action": "sentiment", "text": "I love it" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "sent");
    assert_eq!(body["data"], raw);
    assert_eq!(
        body["result"],
        json!({ "kind": "sentiment", "label": "POSITIVE", "score": 0.87 })
    );
}

#[tokio::test]
async fn analyze_passes_upstream_status_through() {
    let (app, _) = app(
        ScriptedClient::new().script("sum", [AttemptOutcome::hard(429, "Rate limit reached")]),
    );
    let (status, body) = send(
        app,
        json_request("/api/analyze", json!({ "action": "summarize", "text": "long text" })),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({ "error": "Rate limit reached" }));
}

#[tokio::test]
async fn analyze_loading_model_is_503() {
    let (app, _) = app(ScriptedClient::new().script("emb", [loading()]));
    let (status, body) = send(
        app,
        json_request("/api/analyze", json!({ "action": "embed", "text": "vectors" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body["error"],
        "Model is loading or timed out. Please try again in 10-20 seconds."
    );
}

#[tokio::test]
async fn storyteller_validation_and_success() {
    let (app, _) = app(
        ScriptedClient::new().script("story-a", [success(json!([{ "generated_text": "It was dark." }]))]),
    );

    let req = Request::post("/api/storyteller")
        .body(Body::from(r#"{"prompt":"night"}"#))
        .unwrap();
    let (status, body) = send(app.clone(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid content type. Use application/json." }));

    let (status, body) = send(
        app.clone(),
        json_request("/api/storyteller", json!({ "prompt": "night", "maxLength": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "maxLength must be between 1 and 1000" }));

    let (status, body) = send(
        app,
        json_request("/api/storyteller", json!({ "prompt": "night", "temperature": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "model": "story-a", "story": "It was dark." }));
}

#[tokio::test]
async fn caption_requires_multipart() {
    let (app, _) = app(ScriptedClient::new());
    let (status, body) = send(app, json_request("/api/caption", json!({ "image": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid content type. Expected multipart/form-data");
}

#[tokio::test]
async fn caption_missing_image_field() {
    let (app, _) = app(ScriptedClient::new());
    let (status, body) = send(app, multipart_request("photo", "image/png", b"\x89PNG")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing image file");
}

#[tokio::test]
async fn caption_success() {
    let (app, client) = app(
        ScriptedClient::new()
            .script("cap-a", [not_found()])
            .script("cap-b", [success(json!([{ "generated_text": "a lighthouse at dusk" }]))]),
    );
    let (status, body) = send(app, multipart_request("image", "image/png", b"\x89PNG\r\n")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "success": true, "caption": "a lighthouse at dusk", "model": "cap-b" })
    );
    assert_eq!(client.calls(), vec!["cap-a", "cap-b"]);
}

#[tokio::test]
async fn caption_exhaustion_envelope() {
    let (app, _) = app(
        ScriptedClient::new()
            .script("cap-a", [loading()])
            .script("cap-b", [not_found()])
            .script("cap-c", [AttemptOutcome::hard(400, "bad image")]),
    );
    let (status, body) = send(app, multipart_request("image", "image/jpeg", b"\xff\xd8\xff")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "All captioning models are currently unavailable (Free Tier). Please try again later.",
            "attempted_models": ["cap-a", "cap-b", "cap-c"],
        })
    );
}
