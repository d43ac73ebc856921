use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ConversationId, SignalKind};
use super::prompts;
use super::service::{DialogService, DialogServiceError, Reply};
use super::store::SessionStore;

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SignalRequest {
    pub kind: SignalKind,
}

/// HTTP transport for the calculator dialog.
pub fn dialog_router<S>(service: Arc<DialogService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/help", get(help_handler))
        .route(
            "/api/v1/conversations/:conversation_id",
            get(snapshot_handler::<S>),
        )
        .route(
            "/api/v1/conversations/:conversation_id/start",
            post(start_handler::<S>),
        )
        .route(
            "/api/v1/conversations/:conversation_id/reply",
            post(reply_handler::<S>),
        )
        .route(
            "/api/v1/conversations/:conversation_id/signal",
            post(signal_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn help_handler() -> Response {
    (StatusCode::OK, Json(prompts::help())).into_response()
}

pub(crate) async fn start_handler<S>(
    State(service): State<Arc<DialogService<S>>>,
    Path(conversation_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    let conversation = ConversationId(conversation_id);
    reply_response(service.start(&conversation))
}

pub(crate) async fn reply_handler<S>(
    State(service): State<Arc<DialogService<S>>>,
    Path(conversation_id): Path<String>,
    Json(request): Json<ReplyRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let conversation = ConversationId(conversation_id);
    reply_response(service.reply(&conversation, &request.text))
}

pub(crate) async fn signal_handler<S>(
    State(service): State<Arc<DialogService<S>>>,
    Path(conversation_id): Path<String>,
    Json(request): Json<SignalRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let conversation = ConversationId(conversation_id);
    reply_response(service.signal(&conversation, request.kind))
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<DialogService<S>>>,
    Path(conversation_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    let conversation = ConversationId(conversation_id);
    match service.snapshot(&conversation) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(err) => error_response(err),
    }
}

fn reply_response(result: Result<Reply, DialogServiceError>) -> Response {
    match result {
        Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DialogServiceError) -> Response {
    match err {
        DialogServiceError::NoActiveSession => {
            let payload = json!({
                "error": err.to_string(),
                "messages": [prompts::no_active_session()],
            });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
