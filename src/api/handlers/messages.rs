//! Message handlers: list and mark-sent.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::dto::{MarkSentRequest, MessageResponse};
use crate::app_state::AppState;
use crate::domain::{MessageId, Session};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /messages` — List all confirmation messages.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    tag = "Messages",
    summary = "List confirmation messages",
    responses(
        (status = 200, description = "Message list", body = Vec<MessageResponse>),
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    _session: Session,
) -> Result<impl IntoResponse, GatewayError> {
    let messages = state.coordinator.list_messages().await?;
    let body: Vec<MessageResponse> = messages.into_iter().map(MessageResponse::from).collect();
    Ok(Json(body))
}

/// `PATCH /messages/{id}/sent` — Toggle a message's sent flag.
///
/// Clients that treat share/copy as sending call this after the share
/// action; the gateway never sets the flag on its own.
///
/// # Errors
///
/// Returns [`GatewayError`] for a non-manager caller or an unknown
/// message.
#[utoipa::path(
    patch,
    path = "/api/v1/messages/{id}/sent",
    tag = "Messages",
    summary = "Mark a message sent or unsent",
    request_body = MarkSentRequest,
    params(
        ("id" = uuid::Uuid, Path, description = "Message UUID"),
    ),
    responses(
        (status = 200, description = "Updated message", body = MessageResponse),
        (status = 403, description = "Caller is not a manager", body = ErrorResponse),
        (status = 404, description = "Message not found", body = ErrorResponse),
    )
)]
pub async fn mark_sent(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<MarkSentRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let message = state
        .coordinator
        .mark_message_sent(&session, MessageId::from_uuid(id), req.sent)
        .await?;
    Ok(Json(MessageResponse::from(message)))
}

/// Message routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_messages))
        .route("/messages/{id}/sent", patch(mark_sent))
}
