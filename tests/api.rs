//! Router-level tests: the full axum app over an in-memory store and a
//! scripted inference client.

#![allow(clippy::panic, clippy::indexing_slicing)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use vibe_gateway::api::build_app;
use vibe_gateway::app_state::{AppState, ServiceSettings};
use vibe_gateway::domain::EventId;
use vibe_gateway::inference::{ImageInput, InferenceClient, ProviderError};
use vibe_gateway::persistence::MemoryStore;

const BOUNDARY: &str = "vibe-test-boundary";

#[derive(Debug)]
struct ScriptedModel {
    reply: Option<String>,
    image_calls: AtomicUsize,
}

impl ScriptedModel {
    fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            image_calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            image_calls: AtomicUsize::new(0),
        })
    }

    fn outcome(&self, model: &str) -> Result<String, ProviderError> {
        self.reply.clone().ok_or_else(|| ProviderError::Status {
            status: 404,
            message: format!("{model} is not available"),
        })
    }
}

#[async_trait]
impl InferenceClient for ScriptedModel {
    async fn generate_from_image(
        &self,
        model: &str,
        _image: &ImageInput,
        _prompt: &str,
    ) -> Result<String, ProviderError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome(model)
    }

    async fn generate_text(&self, model: &str, _prompt: &str) -> Result<String, ProviderError> {
        self.outcome(model)
    }
}

struct Harness {
    app: Router,
    store: Arc<MemoryStore>,
    model: Arc<ScriptedModel>,
    _uploads: TempDir,
    _profiles: TempDir,
}

fn harness(model: Arc<ScriptedModel>) -> Harness {
    let (Ok(uploads), Ok(profiles)) = (tempfile::tempdir(), tempfile::tempdir()) else {
        panic!("tempdir");
    };
    let store = Arc::new(MemoryStore::new());
    let settings = ServiceSettings {
        upload_dir: uploads.path().to_path_buf(),
        profile_dir: profiles.path().to_path_buf(),
        model_candidates: vec!["model-a".to_string(), "model-b".to_string()],
        model_attempt_timeout: Duration::from_secs(5),
        extraction_prompt: None,
    };
    let state = AppState::new(
        Arc::<MemoryStore>::clone(&store),
        Arc::<ScriptedModel>::clone(&model),
        &settings,
    );
    Harness {
        app: build_app(state, 1024 * 1024),
        store,
        model,
        _uploads: uploads,
        _profiles: profiles,
    }
}

fn multipart_body(photo: Option<(&str, &[u8])>, fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some((file_name, bytes)) = photo {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    let Ok(request) = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
    else {
        panic!("request build failed");
    };
    request
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    let Ok(request) = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
    else {
        panic!("request build failed");
    };
    request
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    let Ok(request) = Request::builder().method(method).uri(uri).body(Body::empty()) else {
        panic!("request build failed");
    };
    request
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router call failed");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body read failed");
    };
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn scan(h: &Harness, user: &str) -> Value {
    let body = multipart_body(Some(("flyer.png", b"png-bytes".as_slice())), &[("user_email", user)]);
    let (status, record) = send(&h.app, multipart_request("/api/scan", body)).await;
    assert_eq!(status, StatusCode::OK, "scan failed: {record}");
    record
}

async fn seed_event(store: &MemoryStore) -> EventId {
    let id = EventId::new();
    let seeded = store
        .insert_document(json!({
            "_id": id.to_string(),
            "event_name": "Warehouse",
            "vibe": ["dark"],
            "likes": [],
            "checkins": [],
            "comments": [],
        }))
        .await;
    assert!(seeded.is_ok());
    id
}

#[tokio::test]
async fn scan_persists_assembled_record() {
    let h = harness(ScriptedModel::answering(
        "```json\n{\"event_name\":\"Neon Nights\",\"venue\":\"Dock 4\",\"likes\":[\"x\"],\"vibe\":[\"loud\"]}\n```",
    ));

    let record = scan(&h, "ana@example.com").await;
    assert_eq!(record["event_name"], "Neon Nights");
    assert_eq!(record["created_by"], "ana@example.com");
    assert_eq!(record["likes"], json!([]));
    assert_eq!(record["checkins"], json!([]));
    assert!(record["_id"].is_string());
    assert_eq!(h.model.image_calls.load(Ordering::SeqCst), 1);

    let Some(url) = record["image_url"].as_str() else {
        panic!("image_url missing");
    };
    assert!(url.starts_with("/uploads/"));
    let Ok(response) = h.app.clone().oneshot(empty_request(Method::GET, url)).await else {
        panic!("router call failed");
    };
    assert_eq!(response.status(), StatusCode::OK);

    let (status, events) = send(&h.app, empty_request(Method::GET, "/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn scan_without_photo_is_rejected_before_any_model_call() {
    let h = harness(ScriptedModel::answering("{}"));
    let body = multipart_body(None, &[("user_email", "ana@example.com")]);

    let (status, body) = send(&h.app, multipart_request("/api/scan", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(h.model.image_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn scan_with_disallowed_extension_is_rejected() {
    let h = harness(ScriptedModel::answering("{}"));
    let body = multipart_body(Some(("notes.txt", b"hello".as_slice())), &[]);
    let (status, _) = send(&h.app, multipart_request("/api/scan", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn exhausted_models_return_500_and_store_nothing() {
    let h = harness(ScriptedModel::failing());
    let body = multipart_body(Some(("flyer.jpg", b"jpg".as_slice())), &[]);

    let (status, body) = send(&h.app, multipart_request("/api/scan", body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let Some(message) = body["error"].as_str() else {
        panic!("error message missing");
    };
    assert!(message.contains("model-b"));
    assert!(!message.contains("model-a"));
    assert_eq!(h.model.image_calls.load(Ordering::SeqCst), 2);

    let (_, events) = send(&h.app, empty_request(Method::GET, "/api/events")).await;
    assert_eq!(events, json!([]));
}

#[tokio::test]
async fn unparseable_extraction_returns_500() {
    let h = harness(ScriptedModel::answering("I can't read this flyer, sorry."));
    let body = multipart_body(Some(("flyer.webp", b"webp".as_slice())), &[]);
    let (status, body) = send(&h.app, multipart_request("/api/scan", body)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 3001);
}

#[tokio::test]
async fn update_without_allowed_keys_is_400_and_leaves_document() {
    let h = harness(ScriptedModel::answering("{}"));
    let id = seed_event(&h.store).await;
    let before = h.store.raw_document(id).await;

    let uri = format!("/api/events/{id}");
    let (status, _) = send(&h.app, json_request(Method::PUT, &uri, &json!({ "foo": "bar" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(h.store.raw_document(id).await, before);

    let (status, updated) = send(
        &h.app,
        json_request(Method::PUT, &uri, &json!({ "ticket_link": "https://t.example" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["ticket_link"], "https://t.example");
}

#[tokio::test]
async fn like_twice_returns_to_not_liked() {
    let h = harness(ScriptedModel::answering("{}"));
    let id = seed_event(&h.store).await;
    let uri = format!("/api/events/{id}/like");
    let body = json!({ "user_email": "ana@example.com" });

    let (_, first) = send(&h.app, json_request(Method::PUT, &uri, &body)).await;
    assert_eq!(first, json!({ "liked": true, "likes": ["ana@example.com"] }));

    let (_, second) = send(&h.app, json_request(Method::PUT, &uri, &body)).await;
    assert_eq!(second, json!({ "liked": false, "likes": [] }));
}

#[tokio::test]
async fn double_checkin_keeps_one_entry() {
    let h = harness(ScriptedModel::answering("{}"));
    let id = seed_event(&h.store).await;
    let uri = format!("/api/events/{id}/checkin");
    let body = json!({ "user": "ana" });

    let _ = send(&h.app, json_request(Method::POST, &uri, &body)).await;
    let (status, response) = send(&h.app, json_request(Method::POST, &uri, &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["checkins"], json!(["ana"]));
}

#[tokio::test]
async fn comments_can_be_added_and_removed() {
    let h = harness(ScriptedModel::answering("{}"));
    let id = seed_event(&h.store).await;
    let uri = format!("/api/events/{id}/comment");

    let (status, _) = send(
        &h.app,
        json_request(Method::POST, &uri, &json!({ "user": "ana", "text": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, comment) = send(
        &h.app,
        json_request(Method::POST, &uri, &json!({ "user": "ana", "text": "see you there" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let Some(comment_id) = comment["id"].as_str() else {
        panic!("comment id missing");
    };

    let remove = format!("/api/events/{id}/comment/{comment_id}");
    let (status, _) = send(&h.app, empty_request(Method::DELETE, &remove)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&h.app, empty_request(Method::DELETE, &remove)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_or_malformed_event_ids_are_404() {
    let h = harness(ScriptedModel::answering("{}"));
    for uri in [
        format!("/api/events/{}", EventId::new()),
        "/api/events/not-a-uuid".to_string(),
    ] {
        let (status, body) = send(&h.app, empty_request(Method::DELETE, &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 2001);
    }
}

#[tokio::test]
async fn ticket_claim_is_idempotent() {
    let h = harness(ScriptedModel::answering("{}"));
    let id = seed_event(&h.store).await;
    let body = json!({
        "event_id": id.to_string(),
        "event_name": "Warehouse",
        "user_email": "ana@example.com",
    });

    let (first_status, first) = send(&h.app, json_request(Method::POST, "/api/tickets/claim", &body)).await;
    let (second_status, second) =
        send(&h.app, json_request(Method::POST, "/api/tickets/claim", &body)).await;

    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["ticket"]["ticket_id"], second["ticket"]["ticket_id"]);
    assert_eq!(h.store.ticket_count().await, 1);

    let (_, tickets) = send(
        &h.app,
        empty_request(Method::GET, "/api/user/ana@example.com/tickets"),
    )
    .await;
    assert_eq!(tickets.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn legacy_events_are_backfilled_on_read_only() {
    let h = harness(ScriptedModel::answering("{}"));
    let id = EventId::new();
    let seeded = h
        .store
        .insert_document(json!({ "_id": id.to_string(), "event_name": "Old Flyer" }))
        .await;
    assert!(seeded.is_ok());

    let (status, events) = send(&h.app, empty_request(Method::GET, "/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events[0]["likes"], json!([]));
    assert_eq!(events[0]["checkins"], json!([]));

    let Some(raw) = h.store.raw_document(id).await else {
        panic!("document should exist");
    };
    assert!(raw.get("likes").is_none());
    assert!(raw.get("checkins").is_none());
}

#[tokio::test]
async fn null_collections_still_list_and_accept_likes() {
    let h = harness(ScriptedModel::answering("{}"));
    let (nulls, anonymous) = (EventId::new(), EventId::new());
    for doc in [
        json!({ "_id": nulls.to_string(), "event_name": "Null Lists", "likes": null, "checkins": null }),
        json!({ "_id": anonymous.to_string(), "event_name": "No Creator", "created_by": null }),
    ] {
        assert!(h.store.insert_document(doc).await.is_ok());
    }

    let (status, events) = send(&h.app, empty_request(Method::GET, "/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().map(Vec::len), Some(2));
    for event in events.as_array().into_iter().flatten() {
        assert_eq!(event["likes"], json!([]));
        assert_eq!(event["checkins"], json!([]));
        assert_eq!(event["comments"], json!([]));
    }
    assert!(
        events
            .as_array()
            .into_iter()
            .flatten()
            .any(|e| e["_id"] == anonymous.to_string() && e["created_by"] == "Anonymous")
    );

    let (status, body) = send(
        &h.app,
        json_request(
            Method::PUT,
            &format!("/api/events/{nulls}/like"),
            &json!({ "user_email": "ana@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], json!(["ana@example.com"]));

    let (status, body) = send(
        &h.app,
        json_request(
            Method::POST,
            &format!("/api/events/{nulls}/checkin"),
            &json!({ "user": "ana" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checkins"], json!(["ana"]));
}

#[tokio::test]
async fn scan_without_multipart_body_gets_json_error() {
    let h = harness(ScriptedModel::answering("{}"));
    let (status, body) = send(&h.app, empty_request(Method::POST, "/api/scan")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(body["code"], 1001);
    assert_eq!(h.model.image_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn unreadable_json_bodies_get_json_errors() {
    let h = harness(ScriptedModel::answering("{}"));
    let id = seed_event(&h.store).await;

    let (status, body) = send(
        &h.app,
        json_request(Method::PUT, &format!("/api/events/{id}"), &json!([1, 2])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1002);
    assert!(body["error"].is_string());

    let Ok(untyped) = Request::builder()
        .method(Method::POST)
        .uri(format!("/api/events/{id}/comment"))
        .body(Body::from(r#"{"user":"ana","text":"hi"}"#))
    else {
        panic!("request build failed");
    };
    let (status, body) = send(&h.app, untyped).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1002);

    let (status, body) = send(
        &h.app,
        json_request(Method::POST, "/api/tickets/claim", &json!({ "event_id": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn ask_ai_always_answers_200() {
    let h = harness(ScriptedModel::failing());

    let (status, body) = send(
        &h.app,
        json_request(Method::POST, "/api/ask-ai", &json!({ "query": "what's on tonight?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].as_str().is_some_and(|r| r.starts_with("Sorry")));

    let Ok(garbage) = Request::builder()
        .method(Method::POST)
        .uri("/api/ask-ai")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
    else {
        panic!("request build failed");
    };
    let (status, body) = send(&h.app, garbage).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["reply"].is_string());
}

#[tokio::test]
async fn avatar_change_does_not_rewrite_existing_events() {
    let h = harness(ScriptedModel::answering("{\"event_name\":\"Gig\"}"));

    let upload = |name: &'static str| {
        multipart_request(
            "/api/user/profile",
            multipart_body(Some((name, b"img".as_slice())), &[("email", "ana@example.com")]),
        )
    };

    let (status, first) = send(&h.app, upload("first.png")).await;
    assert_eq!(status, StatusCode::OK);
    let first_avatar = first["avatar_url"].clone();

    let record = scan(&h, "ana@example.com").await;
    assert_eq!(record["creator_avatar"], first_avatar);

    let (_, second) = send(&h.app, upload("second.png")).await;
    assert_ne!(second["avatar_url"], first_avatar);

    let (_, profile) = send(&h.app, empty_request(Method::GET, "/api/user/ana@example.com")).await;
    assert_eq!(profile["avatar_url"], second["avatar_url"]);

    let (_, events) = send(&h.app, empty_request(Method::GET, "/api/events")).await;
    assert_eq!(events[0]["creator_avatar"], first_avatar);
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let h = harness(ScriptedModel::answering("{}"));
    let (status, _) = send(&h.app, empty_request(Method::GET, "/api/user/ghost@example.com")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_healthy() {
    let h = harness(ScriptedModel::answering("{}"));
    let (status, body) = send(&h.app, empty_request(Method::GET, "/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
