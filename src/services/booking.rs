use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rand::Rng;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    Booking, BookingServiceLine, BookingStatus, Gender, Payment, PaymentMethod, PaymentStatus,
};

const MAX_ADVANCE_DAYS: i64 = 90;
const CONFIRMATION_CODE_LEN: usize = 8;

#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub service_id: String,
    pub quantity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBooking {
    pub salon_id: String,
    pub services: Vec<CartItem>,
    pub booking_date: String,
    pub booking_time: String,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SalonSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub phone_number: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookingLineView {
    pub service_id: String,
    pub name: String,
    pub duration: i64,
    pub category: String,
    pub gender: Gender,
    pub quantity: i64,
    pub price: Decimal,
    pub subtotal: Decimal,
}

/// A booking expanded for client consumption: salon summary, snapshot
/// service lines, and the latest payment when one exists.
#[derive(Debug, Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub salon: SalonSummary,
    pub services: Vec<BookingLineView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
}

fn generate_confirmation_code() -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..CONFIRMATION_CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

fn parse_slot(date: &str, time: &str) -> Result<(NaiveDate, NaiveTime), AppError> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid booking date".to_string()))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .map_err(|_| AppError::Validation("Invalid booking time".to_string()))?;
    Ok((date, time))
}

/// The slot index rejects a second pending/confirmed booking for the same
/// (salon, date, time); surface that as the same conflict the pre-check
/// reports instead of a 500.
fn slot_conflict_or_internal(e: anyhow::Error) -> AppError {
    if let Some(rusqlite::Error::SqliteFailure(err, _)) = e.downcast_ref::<rusqlite::Error>() {
        if err.code == rusqlite::ErrorCode::ConstraintViolation {
            return AppError::Conflict("Time slot already booked".to_string());
        }
    }
    AppError::Internal(e)
}

pub fn create_booking(
    conn: &mut Connection,
    user_id: &str,
    req: &NewBooking,
) -> Result<BookingDetails, AppError> {
    if req.services.is_empty() {
        return Err(AppError::Validation(
            "At least one service must be selected".to_string(),
        ));
    }

    let (date, time) = parse_slot(&req.booking_date, &req.booking_time)?;
    let slot_instant = NaiveDateTime::new(date, time);
    let now = Utc::now().naive_utc();

    if slot_instant <= now {
        return Err(AppError::Validation(
            "Cannot book appointments in the past. Please select a future date and time."
                .to_string(),
        ));
    }
    if slot_instant > now + Duration::days(MAX_ADVANCE_DAYS) {
        return Err(AppError::Validation(format!(
            "Cannot book appointments more than {MAX_ADVANCE_DAYS} days in advance"
        )));
    }

    let salon = queries::get_salon(conn, &req.salon_id)
        .map_err(AppError::Internal)?
        .filter(|s| s.is_active)
        .ok_or_else(|| AppError::NotFound("Salon not found or inactive".to_string()))?;

    let service_ids: Vec<String> = req.services.iter().map(|s| s.service_id.clone()).collect();
    let resolved = queries::get_active_services_by_ids(conn, &salon.id, &service_ids)
        .map_err(AppError::Internal)?;
    if resolved.len() != service_ids.len() {
        return Err(AppError::NotFound(
            "One or more services not found or inactive".to_string(),
        ));
    }

    if queries::slot_taken(conn, &salon.id, &date, &time).map_err(AppError::Internal)? {
        return Err(AppError::Conflict("Time slot already booked".to_string()));
    }

    let booking_id = Uuid::new_v4().to_string();
    let mut total = Decimal::ZERO;
    let mut lines = Vec::with_capacity(req.services.len());
    for item in &req.services {
        let service = resolved
            .iter()
            .find(|s| s.id == item.service_id)
            .ok_or_else(|| {
                AppError::NotFound("One or more services not found or inactive".to_string())
            })?;

        let quantity = item.quantity.filter(|q| *q >= 1).unwrap_or(1);
        let subtotal = service.price * Decimal::from(quantity);
        total += subtotal;

        lines.push(BookingServiceLine {
            id: Uuid::new_v4().to_string(),
            booking_id: booking_id.clone(),
            service_id: service.id.clone(),
            quantity,
            price: service.price,
            subtotal,
        });
    }
    let total = total.round_dp(2);

    // at_shop bookings are confirmed up front; online ones wait on payment
    let status = match req.payment_method {
        PaymentMethod::AtShop => BookingStatus::Confirmed,
        PaymentMethod::Online => BookingStatus::Pending,
    };

    let booking = Booking {
        id: booking_id.clone(),
        user_id: user_id.to_string(),
        salon_id: salon.id.clone(),
        booking_date: date,
        booking_time: time,
        status,
        total_amount: total,
        payment_method: req.payment_method,
        payment_status: PaymentStatus::Pending,
        notes: req.notes.clone(),
        confirmation_code: generate_confirmation_code(),
    };

    let tx = conn.transaction()?;
    queries::insert_booking(&tx, &booking).map_err(slot_conflict_or_internal)?;
    for line in &lines {
        queries::insert_booking_line(&tx, line).map_err(AppError::Internal)?;
    }
    tx.commit()?;

    tracing::info!(
        booking_id = %booking.id,
        user_id = %user_id,
        salon_id = %salon.id,
        services = lines.len(),
        total = %total,
        "booking created"
    );

    load_details(conn, booking)
}

pub fn cancel_booking(
    conn: &Connection,
    booking_id: &str,
    user_id: &str,
) -> Result<BookingDetails, AppError> {
    let booking = queries::get_booking_for_user(conn, booking_id, user_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    match booking.status {
        BookingStatus::Cancelled => {
            return Err(AppError::Validation("Booking already cancelled".to_string()))
        }
        BookingStatus::Completed => {
            return Err(AppError::Validation(
                "Cannot cancel completed booking".to_string(),
            ))
        }
        BookingStatus::Pending | BookingStatus::Confirmed => {}
    }

    // A paid booking flips to refunded in the same update; bookkeeping only,
    // no gateway refund call is issued.
    let payment_status = (booking.payment_status == PaymentStatus::Paid)
        .then_some(PaymentStatus::Refunded);
    queries::update_booking_status(conn, booking_id, BookingStatus::Cancelled, payment_status)
        .map_err(AppError::Internal)?;

    tracing::info!(booking_id = %booking_id, "booking cancelled");

    let booking = queries::get_booking_for_user(conn, booking_id, user_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    load_details(conn, booking)
}

pub fn get_booking(
    conn: &Connection,
    booking_id: &str,
    user_id: &str,
) -> Result<BookingDetails, AppError> {
    let booking = queries::get_booking_for_user(conn, booking_id, user_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
    load_details(conn, booking)
}

pub fn list_user_bookings(
    conn: &Connection,
    user_id: &str,
    status: Option<BookingStatus>,
    page: i64,
    limit: i64,
) -> Result<(Vec<BookingDetails>, i64), AppError> {
    let page = page.max(1);
    let limit = limit.clamp(1, 100);
    let offset = (page - 1) * limit;

    let bookings = queries::list_bookings_for_user(conn, user_id, status, limit, offset)
        .map_err(AppError::Internal)?;
    let total =
        queries::count_bookings_for_user(conn, user_id, status).map_err(AppError::Internal)?;

    let mut details = Vec::with_capacity(bookings.len());
    for booking in bookings {
        details.push(load_details(conn, booking)?);
    }
    Ok((details, total))
}

fn load_details(conn: &Connection, booking: Booking) -> Result<BookingDetails, AppError> {
    let salon = queries::get_salon(conn, &booking.salon_id)
        .map_err(AppError::Internal)?
        .ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "booking {} references missing salon {}",
                booking.id,
                booking.salon_id
            ))
        })?;

    let services = queries::get_booking_lines(conn, &booking.id)
        .map_err(AppError::Internal)?
        .into_iter()
        .map(|detail| BookingLineView {
            service_id: detail.line.service_id,
            name: detail.service_name,
            duration: detail.duration,
            category: detail.category,
            gender: detail.gender,
            quantity: detail.line.quantity,
            price: detail.line.price,
            subtotal: detail.line.subtotal,
        })
        .collect();

    let payment =
        queries::get_latest_payment_for_booking(conn, &booking.id).map_err(AppError::Internal)?;

    Ok(BookingDetails {
        booking,
        salon: SalonSummary {
            id: salon.id,
            name: salon.name,
            address: salon.address,
            city: salon.city,
            phone_number: salon.phone_number,
            image_url: salon.image_url,
        },
        services,
        payment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use rusqlite::params;

    const USER: &str = "user-1";

    fn setup_db() -> Connection {
        let conn = db::init_db(":memory:").unwrap();
        conn.execute(
            "INSERT INTO users (id, phone_number, is_verified) VALUES (?1, ?2, 1)",
            params![USER, "+15551110000"],
        )
        .unwrap();
        conn
    }

    fn seed_salon(conn: &Connection, id: &str, active: bool) {
        conn.execute(
            "INSERT INTO salons (id, name, address, city, state, latitude, longitude,
                 phone_number, rating, is_active)
             VALUES (?1, ?2, '12 Main St', 'Pune', 'MH', 18.52, 73.85, '+912012345678', 4.5, ?3)",
            params![id, format!("Salon {id}"), active as i64],
        )
        .unwrap();
    }

    fn seed_service(conn: &Connection, id: &str, salon_id: &str, price: &str, active: bool) {
        conn.execute(
            "INSERT INTO services (id, salon_id, name, price, duration, category, gender, is_active)
             VALUES (?1, ?2, ?3, ?4, 30, 'hair', 'unisex', ?5)",
            params![id, salon_id, format!("Service {id}"), price, active as i64],
        )
        .unwrap();
    }

    fn future_date(days: i64) -> String {
        (Utc::now().date_naive() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn request(services: Vec<CartItem>) -> NewBooking {
        NewBooking {
            salon_id: "salon-1".to_string(),
            services,
            booking_date: future_date(7),
            booking_time: "10:00".to_string(),
            payment_method: PaymentMethod::AtShop,
            notes: None,
        }
    }

    fn item(service_id: &str, quantity: Option<i64>) -> CartItem {
        CartItem {
            service_id: service_id.to_string(),
            quantity,
        }
    }

    fn seed_default(conn: &Connection) {
        seed_salon(conn, "salon-1", true);
        seed_service(conn, "svc-1", "salon-1", "25.50", true);
        seed_service(conn, "svc-2", "salon-1", "100.00", true);
    }

    #[test]
    fn test_total_is_sum_of_line_subtotals() {
        let mut conn = setup_db();
        seed_default(&conn);

        let details = create_booking(
            &mut conn,
            USER,
            &request(vec![item("svc-1", Some(2)), item("svc-2", None)]),
        )
        .unwrap();

        // 25.50 * 2 + 100.00 * 1
        assert_eq!(details.booking.total_amount, "151.00".parse().unwrap());
        assert_eq!(details.services.len(), 2);
        let sum: Decimal = details.services.iter().map(|l| l.subtotal).sum();
        assert_eq!(sum, details.booking.total_amount);
        assert_eq!(details.booking.status, BookingStatus::Confirmed);
        assert_eq!(details.booking.payment_status, PaymentStatus::Pending);
        assert_eq!(details.booking.confirmation_code.len(), 8);
        assert!(details
            .booking
            .confirmation_code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_online_booking_starts_pending() {
        let mut conn = setup_db();
        seed_default(&conn);

        let mut req = request(vec![item("svc-1", None)]);
        req.payment_method = PaymentMethod::Online;
        let details = create_booking(&mut conn, USER, &req).unwrap();

        assert_eq!(details.booking.status, BookingStatus::Pending);
        assert_eq!(details.booking.payment_status, PaymentStatus::Pending);
    }

    #[test]
    fn test_invalid_quantity_defaults_to_one() {
        let mut conn = setup_db();
        seed_default(&conn);

        let details =
            create_booking(&mut conn, USER, &request(vec![item("svc-1", Some(0))])).unwrap();
        assert_eq!(details.services[0].quantity, 1);
        assert_eq!(details.booking.total_amount, "25.50".parse().unwrap());
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut conn = setup_db();
        seed_default(&conn);

        let err = create_booking(&mut conn, USER, &request(vec![])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_past_booking_rejected() {
        let mut conn = setup_db();
        seed_default(&conn);

        let mut req = request(vec![item("svc-1", None)]);
        req.booking_date = future_date(-1);
        let err = create_booking(&mut conn, USER, &req).unwrap_err();
        assert!(err.to_string().contains("in the past"));
    }

    #[test]
    fn test_booking_window_boundaries() {
        let mut conn = setup_db();
        seed_default(&conn);

        let mut req = request(vec![item("svc-1", None)]);
        req.booking_date = future_date(91);
        let err = create_booking(&mut conn, USER, &req).unwrap_err();
        assert!(err.to_string().contains("90 days"));

        let mut req = request(vec![item("svc-1", None)]);
        req.booking_date = future_date(89);
        assert!(create_booking(&mut conn, USER, &req).is_ok());
    }

    #[test]
    fn test_inactive_salon_rejected() {
        let mut conn = setup_db();
        seed_salon(&conn, "salon-1", false);
        seed_service(&conn, "svc-1", "salon-1", "25.50", true);

        let err = create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_unknown_salon_rejected() {
        let mut conn = setup_db();
        seed_default(&conn);

        let mut req = request(vec![item("svc-1", None)]);
        req.salon_id = "salon-missing".to_string();
        let err = create_booking(&mut conn, USER, &req).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_inactive_service_rejected() {
        let mut conn = setup_db();
        seed_salon(&conn, "salon-1", true);
        seed_service(&conn, "svc-1", "salon-1", "25.50", false);

        let err = create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap_err();
        assert!(err.to_string().contains("services not found or inactive"));
    }

    #[test]
    fn test_cross_salon_service_rejected() {
        let mut conn = setup_db();
        seed_default(&conn);
        seed_salon(&conn, "salon-2", true);
        seed_service(&conn, "svc-other", "salon-2", "40.00", true);

        let err = create_booking(
            &mut conn,
            USER,
            &request(vec![item("svc-1", None), item("svc-other", None)]),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_slot_conflict_rejected() {
        let mut conn = setup_db();
        seed_default(&conn);

        create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap();
        let err = create_booking(&mut conn, USER, &request(vec![item("svc-2", None)])).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_cancelled_slot_can_be_rebooked() {
        let mut conn = setup_db();
        seed_default(&conn);

        let first = create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap();
        cancel_booking(&conn, &first.booking.id, USER).unwrap();

        assert!(create_booking(&mut conn, USER, &request(vec![item("svc-2", None)])).is_ok());
    }

    #[test]
    fn test_slot_unique_index_backs_the_check() {
        let conn = setup_db();
        seed_default(&conn);

        // Two raw inserts for the same slot: the second must hit the partial
        // unique index even without the service-level pre-check.
        let insert = |id: &str, status: &str| {
            conn.execute(
                "INSERT INTO bookings (id, user_id, salon_id, booking_date, booking_time,
                     status, total_amount, payment_method, payment_status, confirmation_code)
                 VALUES (?1, ?2, 'salon-1', '2031-01-01', '10:00', ?3, '10.00', 'at_shop',
                     'pending', ?1)",
                params![id, USER, status],
            )
        };
        insert("bk-a", "confirmed").unwrap();
        assert!(insert("bk-b", "pending").is_err());
        // A cancelled booking falls out of the index
        insert("bk-c", "cancelled").unwrap();
    }

    #[test]
    fn test_failed_creation_leaves_no_rows() {
        let mut conn = setup_db();
        seed_default(&conn);

        let err = create_booking(
            &mut conn,
            USER,
            &request(vec![item("svc-1", None), item("svc-missing", None)]),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let bookings: i64 = conn
            .query_row("SELECT COUNT(*) FROM bookings", [], |row| row.get(0))
            .unwrap();
        let lines: i64 = conn
            .query_row("SELECT COUNT(*) FROM booking_services", [], |row| row.get(0))
            .unwrap();
        assert_eq!(bookings, 0);
        assert_eq!(lines, 0);
    }

    #[test]
    fn test_line_price_is_snapshot() {
        let mut conn = setup_db();
        seed_default(&conn);

        let details =
            create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap();

        conn.execute("UPDATE services SET price = '999.00' WHERE id = 'svc-1'", [])
            .unwrap();

        let reloaded = get_booking(&conn, &details.booking.id, USER).unwrap();
        assert_eq!(reloaded.services[0].price, "25.50".parse().unwrap());
        assert_eq!(reloaded.booking.total_amount, "25.50".parse().unwrap());
    }

    #[test]
    fn test_cancel_transitions() {
        let mut conn = setup_db();
        seed_default(&conn);

        let details =
            create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap();
        let id = details.booking.id.clone();

        let cancelled = cancel_booking(&conn, &id, USER).unwrap();
        assert_eq!(cancelled.booking.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.booking.payment_status, PaymentStatus::Pending);

        // Second cancel fails
        let err = cancel_booking(&conn, &id, USER).unwrap_err();
        assert!(err.to_string().contains("already cancelled"));
    }

    #[test]
    fn test_cancel_paid_booking_marks_refunded() {
        let mut conn = setup_db();
        seed_default(&conn);

        let details =
            create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap();
        let id = details.booking.id.clone();
        queries::update_booking_payment(
            &conn,
            &id,
            PaymentMethod::Online,
            PaymentStatus::Paid,
            Some(BookingStatus::Confirmed),
        )
        .unwrap();

        let cancelled = cancel_booking(&conn, &id, USER).unwrap();
        assert_eq!(cancelled.booking.status, BookingStatus::Cancelled);
        assert_eq!(cancelled.booking.payment_status, PaymentStatus::Refunded);
    }

    #[test]
    fn test_cancel_completed_booking_fails() {
        let mut conn = setup_db();
        seed_default(&conn);

        let details =
            create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap();
        let id = details.booking.id.clone();
        queries::update_booking_status(&conn, &id, BookingStatus::Completed, None).unwrap();

        let err = cancel_booking(&conn, &id, USER).unwrap_err();
        assert!(err.to_string().contains("completed"));
    }

    #[test]
    fn test_ownership_scoping() {
        let mut conn = setup_db();
        seed_default(&conn);
        conn.execute(
            "INSERT INTO users (id, phone_number, is_verified) VALUES ('user-2', '+15552220000', 1)",
            [],
        )
        .unwrap();

        let details =
            create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap();
        let id = details.booking.id.clone();

        // Foreign user sees not-found, both on read and on cancel
        assert!(matches!(
            get_booking(&conn, &id, "user-2").unwrap_err(),
            AppError::NotFound(_)
        ));
        assert!(matches!(
            cancel_booking(&conn, &id, "user-2").unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_list_orders_and_paginates() {
        let mut conn = setup_db();
        seed_default(&conn);

        for (day, time) in [(5, "10:00"), (3, "14:00"), (3, "09:00")] {
            let mut req = request(vec![item("svc-1", None)]);
            req.booking_date = future_date(day);
            req.booking_time = time.to_string();
            create_booking(&mut conn, USER, &req).unwrap();
        }

        let (page, total) = list_user_bookings(&conn, USER, None, 1, 2).unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        // Latest date first, then latest time
        assert_eq!(page[0].booking.booking_date, (Utc::now().date_naive() + Duration::days(5)));
        assert_eq!(page[1].booking.booking_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());

        let (page2, _) = list_user_bookings(&conn, USER, None, 2, 2).unwrap();
        assert_eq!(page2.len(), 1);
        assert_eq!(
            page2[0].booking.booking_time,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_list_filters_by_status() {
        let mut conn = setup_db();
        seed_default(&conn);

        let details =
            create_booking(&mut conn, USER, &request(vec![item("svc-1", None)])).unwrap();
        cancel_booking(&conn, &details.booking.id, USER).unwrap();

        let mut req = request(vec![item("svc-2", None)]);
        req.booking_time = "11:00".to_string();
        create_booking(&mut conn, USER, &req).unwrap();

        let (cancelled, total) =
            list_user_bookings(&conn, USER, Some(BookingStatus::Cancelled), 1, 20).unwrap();
        assert_eq!(total, 1);
        assert_eq!(cancelled[0].booking.status, BookingStatus::Cancelled);
    }

    #[test]
    fn test_round_trip_subtotals_match_total() {
        let mut conn = setup_db();
        seed_salon(&conn, "salon-1", true);
        seed_service(&conn, "svc-1", "salon-1", "19.99", true);
        seed_service(&conn, "svc-2", "salon-1", "7.25", true);

        let created = create_booking(
            &mut conn,
            USER,
            &request(vec![item("svc-1", Some(3)), item("svc-2", Some(2))]),
        )
        .unwrap();

        let fetched = get_booking(&conn, &created.booking.id, USER).unwrap();
        let sum: Decimal = fetched.services.iter().map(|l| l.subtotal).sum();
        assert_eq!(sum, fetched.booking.total_amount);
        assert_eq!(fetched.booking.total_amount, "74.47".parse().unwrap());
    }
}
