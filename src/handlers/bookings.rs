use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use super::authenticate;
use crate::errors::AppError;
use crate::models::{BookingStatus, PaymentMethod};
use crate::services::booking::{self, NewBooking};
use crate::state::AppState;

// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewBooking>,
) -> Result<Response, AppError> {
    let claims = authenticate(&headers, &state)?;

    let details = {
        let mut db = state.db.lock().unwrap();
        booking::create_booking(&mut db, &claims.user_id, &body)?
    };

    let message = match body.payment_method {
        PaymentMethod::AtShop => "Booking confirmed! Pay at the salon.",
        PaymentMethod::Online => "Booking created successfully",
    };

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": message,
            "data": { "booking": details },
        })),
    )
        .into_response())
}

// GET /bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = authenticate(&headers, &state)?;

    let status = match query.status.as_deref() {
        Some(s) => Some(
            BookingStatus::parse(s)
                .ok_or_else(|| AppError::Validation(format!("Invalid status filter: {s}")))?,
        ),
        None => None,
    };
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(20);

    let (bookings, total) = {
        let db = state.db.lock().unwrap();
        booking::list_user_bookings(&db, &claims.user_id, status, page, limit)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "bookings": bookings,
            "pagination": { "page": page, "limit": limit, "total": total },
        },
    })))
}

// GET /bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = authenticate(&headers, &state)?;

    let details = {
        let db = state.db.lock().unwrap();
        booking::get_booking(&db, &id, &claims.user_id)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "booking": details },
    })))
}

// PATCH /bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = authenticate(&headers, &state)?;

    let details = {
        let db = state.db.lock().unwrap();
        booking::cancel_booking(&db, &id, &claims.user_id)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Booking cancelled successfully",
        "data": { "booking": details },
    })))
}
