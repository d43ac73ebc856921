use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::dialog::router::{
    help_handler, reply_handler, signal_handler, snapshot_handler, start_handler, ReplyRequest,
};
use crate::dialog::{DialogService, InMemorySessionStore};

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::post(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn help_handler_lists_commands() {
    let response = help_handler().await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let text = payload["text"].as_str().expect("help text");
    for command in ["/start", "/help", "/cancel", "/clear"] {
        assert!(text.contains(command), "missing {command}");
    }
}

#[tokio::test]
async fn reply_handler_returns_not_found_without_session() {
    let (service, _) = build_service();

    let response = reply_handler::<InMemorySessionStore>(
        State(Arc::new(service)),
        Path("chat-1".to_string()),
        axum::Json(ReplyRequest {
            text: "30".to_string(),
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload["messages"][0]["text"]
        .as_str()
        .unwrap()
        .contains("/start"));
}

#[tokio::test]
async fn start_handler_returns_internal_error_on_store_failure() {
    let service = Arc::new(DialogService::new(Arc::new(UnavailableStore)));

    let response =
        start_handler::<UnavailableStore>(State(service), Path("chat-1".to_string())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn snapshot_handler_reports_collected_values() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let chat = conversation("chat-1");
    service.start(&chat).unwrap();
    service.reply(&chat, "Reading").unwrap();
    service.reply(&chat, "General Training").unwrap();

    let response = snapshot_handler::<InMemorySessionStore>(
        State(service.clone()),
        Path("chat-1".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["state"], "await_raw_reading");
    assert_eq!(payload["workflow"], "reading");
    assert_eq!(payload["values"]["module"], "general_training");
}

#[tokio::test]
async fn signal_handler_accepts_cancel_without_session() {
    let (service, _) = build_service();

    let response = signal_handler::<InMemorySessionStore>(
        State(Arc::new(service)),
        Path("idle".to_string()),
        axum::Json(crate::dialog::router::SignalRequest {
            kind: crate::dialog::SignalKind::Cancel,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["session_ended"], true);
}

#[tokio::test]
async fn routes_drive_speaking_calculation() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_empty("/api/v1/conversations/chat-9/start"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let mut last = Value::Null;
    for text in ["🗣️ Speaking", "6.0", "6.5", "7.0", "6.5"] {
        let response = router
            .clone()
            .oneshot(post_json(
                "/api/v1/conversations/chat-9/reply",
                json!({ "text": text }),
            ))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        last = read_json_body(response).await;
    }

    assert_eq!(last["session_ended"], true);
    assert_eq!(last["result"]["workflow"], "speaking");
    assert_eq!(last["result"]["overall"], 6.5);
    assert!(last.get("state").map_or(true, Value::is_null));
}

#[tokio::test]
async fn reply_route_reports_rejection_kind() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    router
        .clone()
        .oneshot(post_empty("/api/v1/conversations/chat-2/start"))
        .await
        .unwrap();
    router
        .clone()
        .oneshot(post_json(
            "/api/v1/conversations/chat-2/reply",
            json!({ "text": "Listening" }),
        ))
        .await
        .unwrap();

    let response = router
        .oneshot(post_json(
            "/api/v1/conversations/chat-2/reply",
            json!({ "text": "41" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rejected"], "out_of_range");
    assert_eq!(payload["state"], "await_raw_listening");
    assert_eq!(payload["expecting"], "raw_score");
}

#[tokio::test]
async fn signal_route_rejects_unknown_kind() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/conversations/chat-3/signal",
            json!({ "kind": "rewind" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn snapshot_route_returns_not_found_for_unknown_conversation() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/conversations/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
