use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::authenticate;
use crate::errors::AppError;
use crate::services::payment::{self, PaymentOutcome};
use crate::state::AppState;

// POST /payments/process
#[derive(Deserialize)]
pub struct ProcessPaymentRequest {
    pub booking_id: String,
    pub payment_method: String,
}

pub async fn process_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ProcessPaymentRequest>,
) -> Result<Response, AppError> {
    let claims = authenticate(&headers, &state)?;

    let outcome = payment::process_payment(
        &state,
        &claims.user_id,
        &body.booking_id,
        &body.payment_method,
    )
    .await?;

    let response = match outcome {
        PaymentOutcome::AtShop { payment, booking } => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Booking confirmed. Pay at shop.",
                "data": {
                    "payment": payment,
                    "booking": {
                        "id": booking.id,
                        "confirmation_code": booking.confirmation_code,
                        "status": booking.status,
                        "payment_method": booking.payment_method,
                    },
                },
            })),
        ),
        PaymentOutcome::Paid { payment, booking } => (
            StatusCode::OK,
            Json(serde_json::json!({
                "success": true,
                "message": "Payment processed successfully",
                "data": {
                    "payment": payment,
                    "booking": {
                        "id": booking.id,
                        "confirmation_code": booking.confirmation_code,
                        "status": booking.status,
                        "payment_status": booking.payment_status,
                    },
                },
            })),
        ),
        // A decline is a business outcome, rendered in the envelope
        PaymentOutcome::Declined { payment, reason } => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "message": "Payment failed",
                "data": { "payment": payment, "reason": reason },
            })),
        ),
    };

    Ok(response.into_response())
}

// GET /payments/booking/:booking_id
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = authenticate(&headers, &state)?;

    let payment = {
        let db = state.db.lock().unwrap();
        payment::get_payment_for_booking(&db, &booking_id, &claims.user_id)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "payment": payment },
    })))
}
