use chrono::Utc;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, Payment, PaymentMethod, PaymentState, PaymentStatus};
use crate::state::AppState;

#[derive(Debug)]
pub enum PaymentOutcome {
    /// Shop collects later; booking is confirmed with a pending payment row.
    AtShop { payment: Payment, booking: Booking },
    /// Gateway approved the charge.
    Paid { payment: Payment, booking: Booking },
    /// Gateway declined; recorded as a failed payment, not an error.
    Declined { payment: Payment, reason: String },
}

pub async fn process_payment(
    state: &AppState,
    user_id: &str,
    booking_id: &str,
    method: &str,
) -> Result<PaymentOutcome, AppError> {
    let method = PaymentMethod::parse(method)
        .ok_or_else(|| AppError::Validation("Invalid payment method".to_string()))?;

    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking_for_user(&db, booking_id, user_id)
            .map_err(AppError::Internal)?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?
    };

    if booking.payment_status == PaymentStatus::Paid {
        return Err(AppError::Conflict("Booking already paid".to_string()));
    }

    match method {
        PaymentMethod::AtShop => {
            let db = state.db.lock().unwrap();
            queries::update_booking_payment(
                &db,
                booking_id,
                PaymentMethod::AtShop,
                PaymentStatus::Pending,
                Some(BookingStatus::Confirmed),
            )
            .map_err(AppError::Internal)?;

            let payment = Payment {
                id: Uuid::new_v4().to_string(),
                booking_id: booking_id.to_string(),
                amount: booking.total_amount,
                payment_method: PaymentMethod::AtShop,
                status: PaymentState::Pending,
                transaction_id: None,
                gateway_response: None,
                paid_at: None,
            };
            queries::insert_payment(&db, &payment).map_err(AppError::Internal)?;

            tracing::info!(booking_id = %booking_id, "pay at shop selected");

            let booking = refetch(&db, booking_id, user_id)?;
            Ok(PaymentOutcome::AtShop { payment, booking })
        }
        PaymentMethod::Online => {
            tracing::info!(booking_id = %booking_id, amount = %booking.total_amount, "processing online payment");

            // The gateway call is slow; it must run without the db lock held.
            let outcome = state
                .gateway
                .charge(booking.total_amount, booking_id)
                .await
                .map_err(AppError::Internal)?;

            let db = state.db.lock().unwrap();
            if outcome.success {
                let payment = Payment {
                    id: Uuid::new_v4().to_string(),
                    booking_id: booking_id.to_string(),
                    amount: booking.total_amount,
                    payment_method: PaymentMethod::Online,
                    status: PaymentState::Success,
                    transaction_id: outcome.transaction_id.clone(),
                    gateway_response: Some(outcome.gateway_response()),
                    paid_at: Some(Utc::now().naive_utc()),
                };
                queries::insert_payment(&db, &payment).map_err(AppError::Internal)?;
                queries::update_booking_payment(
                    &db,
                    booking_id,
                    PaymentMethod::Online,
                    PaymentStatus::Paid,
                    Some(BookingStatus::Confirmed),
                )
                .map_err(AppError::Internal)?;

                tracing::info!(
                    booking_id = %booking_id,
                    transaction_id = outcome.transaction_id.as_deref().unwrap_or(""),
                    "payment successful"
                );

                let booking = refetch(&db, booking_id, user_id)?;
                Ok(PaymentOutcome::Paid { payment, booking })
            } else {
                let payment = Payment {
                    id: Uuid::new_v4().to_string(),
                    booking_id: booking_id.to_string(),
                    amount: booking.total_amount,
                    payment_method: PaymentMethod::Online,
                    status: PaymentState::Failed,
                    transaction_id: None,
                    gateway_response: Some(outcome.gateway_response()),
                    paid_at: None,
                };
                queries::insert_payment(&db, &payment).map_err(AppError::Internal)?;
                // Booking status stays put; only the payment state records the failure
                queries::update_booking_payment(
                    &db,
                    booking_id,
                    PaymentMethod::Online,
                    PaymentStatus::Failed,
                    None,
                )
                .map_err(AppError::Internal)?;

                tracing::warn!(booking_id = %booking_id, "payment failed");

                Ok(PaymentOutcome::Declined {
                    payment,
                    reason: outcome.message,
                })
            }
        }
    }
}

pub fn get_payment_for_booking(
    conn: &Connection,
    booking_id: &str,
    user_id: &str,
) -> Result<Payment, AppError> {
    queries::get_booking_for_user(conn, booking_id, user_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    queries::get_latest_payment_for_booking(conn, booking_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
}

fn refetch(conn: &Connection, booking_id: &str, user_id: &str) -> Result<Booking, AppError> {
    queries::get_booking_for_user(conn, booking_id, user_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
}
