//! Event CRUD handlers: create, list, get, update, delete, regenerate.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    CreateEventRequest, EventResponse, ListEventsQuery, UpdateEventRequest,
};
use crate::app_state::AppState;
use crate::domain::{EventId, Session};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /events` — Create an event with its message and payment set.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure, a non-manager caller,
/// or a store failure.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    summary = "Create an event",
    description = "Creates a promotional work assignment. The confirmation message and one payment record per promoter are derived and stored in the same operation.",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created with dependents", body = EventResponse),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 403, description = "Caller is not a manager", body = ErrorResponse),
        (status = 500, description = "Stored but dependent generation failed", body = ErrorResponse),
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let draft = req.into_draft(session.user_id.clone());
    let event = state.coordinator.create_event(&session, draft).await?;
    Ok((StatusCode::CREATED, Json(EventResponse::from(event))))
}

/// `GET /events` — List events, optionally for one day.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List events",
    description = "Returns all events, or only those on the given calendar day.",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Event list", body = Vec<EventResponse>),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    _session: Session,
    Query(query): Query<ListEventsQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let events = match query.date {
        Some(date) => state.coordinator.list_events_by_date(date).await?,
        None => state.coordinator.list_events().await?,
    };
    let body: Vec<EventResponse> = events.into_iter().map(EventResponse::from).collect();
    Ok(Json(body))
}

/// `GET /events/{id}` — Get one event.
///
/// # Errors
///
/// Returns [`GatewayError::EventNotFound`] if the event does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Get event details",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event details", body = EventResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    _session: Session,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state.coordinator.get_event(EventId::from_uuid(id)).await?;
    Ok(Json(EventResponse::from(event)))
}

/// `PUT /events/{id}` — Replace an event's descriptive fields.
///
/// The stored message is regenerated in place and the payment set is
/// replaced wholesale (paid flags reset).
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure, a non-manager caller,
/// an unknown event, or a store failure.
#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Update an event",
    request_body = UpdateEventRequest,
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Event updated, dependents regenerated", body = EventResponse),
        (status = 400, description = "Missing required fields", body = ErrorResponse),
        (status = 403, description = "Caller is not a manager", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state
        .coordinator
        .update_event(&session, EventId::from_uuid(id), req.into_patch())
        .await?;
    Ok(Json(EventResponse::from(event)))
}

/// `DELETE /events/{id}` — Delete an event and everything derived from it.
///
/// # Errors
///
/// Returns [`GatewayError`] for a non-manager caller or an unknown event.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    summary = "Delete an event",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 204, description = "Event and dependents deleted"),
        (status = 403, description = "Caller is not a manager", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn delete_event(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    state
        .coordinator
        .delete_event(&session, EventId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /events/{id}/regenerate` — Rebuild an event's dependents.
///
/// Recovery action after a partial failure; safe to repeat. Note the
/// rebuilt message is a fresh row: its sent flag starts over.
///
/// # Errors
///
/// Returns [`GatewayError`] for a non-manager caller or an unknown event.
#[utoipa::path(
    post,
    path = "/api/v1/events/{id}/regenerate",
    tag = "Events",
    summary = "Regenerate an event's dependents",
    params(
        ("id" = uuid::Uuid, Path, description = "Event UUID"),
    ),
    responses(
        (status = 200, description = "Dependents rebuilt", body = EventResponse),
        (status = 403, description = "Caller is not a manager", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
    )
)]
pub async fn regenerate_event(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, GatewayError> {
    let event = state
        .coordinator
        .regenerate_dependents(&session, EventId::from_uuid(id))
        .await?;
    Ok(Json(EventResponse::from(event)))
}

/// Event routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/{id}/regenerate", post(regenerate_event))
}
