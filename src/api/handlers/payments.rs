//! Payment handlers: list and mark-paid.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::dto::{MarkPaidRequest, PaymentResponse};
use crate::app_state::AppState;
use crate::domain::{PaymentId, Session};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /payments` — List all payment records.
///
/// # Errors
///
/// Returns [`GatewayError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/v1/payments",
    tag = "Payments",
    summary = "List payment records",
    responses(
        (status = 200, description = "Payment list", body = Vec<PaymentResponse>),
    )
)]
pub async fn list_payments(
    State(state): State<AppState>,
    _session: Session,
) -> Result<impl IntoResponse, GatewayError> {
    let payments = state.coordinator.list_payments().await?;
    let body: Vec<PaymentResponse> = payments.into_iter().map(PaymentResponse::from).collect();
    Ok(Json(body))
}

/// `PATCH /payments/{id}/paid` — Toggle a payment record's paid flag.
///
/// Event edits never touch this flag; only this endpoint does. An event
/// edit does, however, replace the whole payment set, which starts the
/// new records unpaid.
///
/// # Errors
///
/// Returns [`GatewayError`] for a non-manager caller or an unknown
/// payment.
#[utoipa::path(
    patch,
    path = "/api/v1/payments/{id}/paid",
    tag = "Payments",
    summary = "Mark a payment paid or unpaid",
    request_body = MarkPaidRequest,
    params(
        ("id" = uuid::Uuid, Path, description = "Payment UUID"),
    ),
    responses(
        (status = 200, description = "Updated payment record", body = PaymentResponse),
        (status = 403, description = "Caller is not a manager", body = ErrorResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse),
    )
)]
pub async fn mark_paid(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<MarkPaidRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let record = state
        .coordinator
        .mark_payment_paid(&session, PaymentId::from_uuid(id), req.paid)
        .await?;
    Ok(Json(PaymentResponse::from(record)))
}

/// Payment routes mounted under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments))
        .route("/payments/{id}/paid", patch(mark_paid))
}
