use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use rusqlite::{params, Connection};

use crate::models::{
    Booking, BookingServiceLine, BookingStatus, Gender, Otp, Payment, PaymentMethod, PaymentState,
    PaymentStatus, Salon, Service, User,
};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";

fn now_str() -> String {
    Utc::now().naive_utc().format(DATETIME_FMT).to_string()
}

fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).unwrap_or_else(|_| Utc::now().naive_utc())
}

fn parse_decimal(s: &str) -> Decimal {
    s.parse().unwrap_or_default()
}

// ── Users ──

fn parse_user_row(row: &rusqlite::Row) -> anyhow::Result<User> {
    let last_login: Option<String> = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        phone_number: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        is_verified: row.get::<_, i64>(4)? != 0,
        last_login_at: last_login.map(|s| parse_datetime(&s)),
    })
}

const USER_COLS: &str = "id, phone_number, name, email, is_verified, last_login_at";

pub fn get_user_by_id(conn: &Connection, id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLS} FROM users WHERE id = ?1"),
        params![id],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_phone(conn: &Connection, phone: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLS} FROM users WHERE phone_number = ?1"),
        params![phone],
        |row| Ok(parse_user_row(row)),
    );

    match result {
        Ok(user) => Ok(Some(user?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    let last_login = user
        .last_login_at
        .map(|dt| dt.format(DATETIME_FMT).to_string());
    conn.execute(
        "INSERT INTO users (id, phone_number, name, email, is_verified, last_login_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.phone_number,
            user.name,
            user.email,
            user.is_verified as i64,
            last_login,
        ],
    )?;
    Ok(())
}

pub fn touch_user_login(conn: &Connection, id: &str) -> anyhow::Result<()> {
    let now = now_str();
    conn.execute(
        "UPDATE users SET is_verified = 1, last_login_at = ?1, updated_at = ?1 WHERE id = ?2",
        params![now, id],
    )?;
    Ok(())
}

pub fn update_user_profile(
    conn: &Connection,
    id: &str,
    name: Option<&str>,
    email: Option<&str>,
) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET
           name = COALESCE(?1, name),
           email = COALESCE(?2, email),
           updated_at = ?3
         WHERE id = ?4",
        params![name, email, now_str(), id],
    )?;
    Ok(count > 0)
}

// ── OTPs ──

pub fn invalidate_unused_otps(conn: &Connection, phone: &str) -> anyhow::Result<usize> {
    let count = conn.execute(
        "UPDATE otps SET is_used = 1 WHERE phone_number = ?1 AND is_used = 0",
        params![phone],
    )?;
    Ok(count)
}

pub fn create_otp(conn: &Connection, otp: &Otp) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO otps (id, phone_number, code, expires_at, is_used, attempts)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            otp.id,
            otp.phone_number,
            otp.code,
            otp.expires_at.format(DATETIME_FMT).to_string(),
            otp.is_used as i64,
            otp.attempts,
        ],
    )?;
    Ok(())
}

pub fn get_latest_unused_otp(conn: &Connection, phone: &str) -> anyhow::Result<Option<Otp>> {
    let result = conn.query_row(
        "SELECT id, phone_number, code, expires_at, is_used, attempts
         FROM otps WHERE phone_number = ?1 AND is_used = 0
         ORDER BY created_at DESC, rowid DESC LIMIT 1",
        params![phone],
        |row| {
            let expires_at: String = row.get(3)?;
            Ok(Otp {
                id: row.get(0)?,
                phone_number: row.get(1)?,
                code: row.get(2)?,
                expires_at: parse_datetime(&expires_at),
                is_used: row.get::<_, i64>(4)? != 0,
                attempts: row.get(5)?,
            })
        },
    );

    match result {
        Ok(otp) => Ok(Some(otp)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn mark_otp_used(conn: &Connection, id: &str) -> anyhow::Result<()> {
    conn.execute("UPDATE otps SET is_used = 1 WHERE id = ?1", params![id])?;
    Ok(())
}

pub fn increment_otp_attempts(conn: &Connection, id: &str) -> anyhow::Result<()> {
    conn.execute(
        "UPDATE otps SET attempts = attempts + 1 WHERE id = ?1",
        params![id],
    )?;
    Ok(())
}

// ── Salons ──

const SALON_COLS: &str = "id, name, description, address, city, state, zip_code, latitude, \
     longitude, phone_number, email, rating, total_reviews, image_url, opening_time, \
     closing_time, is_active";

fn parse_salon_row(row: &rusqlite::Row) -> anyhow::Result<Salon> {
    Ok(Salon {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        address: row.get(3)?,
        city: row.get(4)?,
        state: row.get(5)?,
        zip_code: row.get(6)?,
        latitude: row.get(7)?,
        longitude: row.get(8)?,
        phone_number: row.get(9)?,
        email: row.get(10)?,
        rating: row.get(11)?,
        total_reviews: row.get(12)?,
        image_url: row.get(13)?,
        opening_time: row.get(14)?,
        closing_time: row.get(15)?,
        is_active: row.get::<_, i64>(16)? != 0,
    })
}

pub fn list_salons(
    conn: &Connection,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Salon>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match search {
        Some(term) => (
            format!(
                "SELECT {SALON_COLS} FROM salons
                 WHERE is_active = 1
                   AND (name LIKE ?1 OR city LIKE ?1 OR COALESCE(description, '') LIKE ?1)
                 ORDER BY rating DESC LIMIT ?2 OFFSET ?3"
            ),
            vec![
                Box::new(format!("%{term}%")) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
                Box::new(offset),
            ],
        ),
        None => (
            format!(
                "SELECT {SALON_COLS} FROM salons WHERE is_active = 1
                 ORDER BY rating DESC LIMIT ?1 OFFSET ?2"
            ),
            vec![
                Box::new(limit) as Box<dyn rusqlite::types::ToSql>,
                Box::new(offset),
            ],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_salon_row(row)))?;

    let mut salons = vec![];
    for row in rows {
        salons.push(row??);
    }
    Ok(salons)
}

pub fn get_salon(conn: &Connection, id: &str) -> anyhow::Result<Option<Salon>> {
    let result = conn.query_row(
        &format!("SELECT {SALON_COLS} FROM salons WHERE id = ?1"),
        params![id],
        |row| Ok(parse_salon_row(row)),
    );

    match result {
        Ok(salon) => Ok(Some(salon?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Services ──

const SERVICE_COLS: &str =
    "id, salon_id, name, description, price, duration, category, gender, is_active";

fn parse_service_row(row: &rusqlite::Row) -> anyhow::Result<Service> {
    let price: String = row.get(4)?;
    let gender: String = row.get(7)?;
    Ok(Service {
        id: row.get(0)?,
        salon_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        price: parse_decimal(&price),
        duration: row.get(5)?,
        category: row.get(6)?,
        gender: Gender::parse(&gender),
        is_active: row.get::<_, i64>(8)? != 0,
    })
}

pub fn list_services_for_salon(conn: &Connection, salon_id: &str) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SERVICE_COLS} FROM services
         WHERE salon_id = ?1 AND is_active = 1
         ORDER BY category ASC, CAST(price AS REAL) ASC"
    ))?;
    let rows = stmt.query_map(params![salon_id], |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

/// Resolve cart service ids against a salon. Only active services belonging
/// to the salon come back, so a shorter result than `ids` means the cart
/// references something missing, inactive, or foreign.
pub fn get_active_services_by_ids(
    conn: &Connection,
    salon_id: &str,
    ids: &[String],
) -> anyhow::Result<Vec<Service>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let placeholders: Vec<String> = (0..ids.len()).map(|i| format!("?{}", i + 2)).collect();
    let sql = format!(
        "SELECT {SERVICE_COLS} FROM services
         WHERE salon_id = ?1 AND is_active = 1 AND id IN ({})",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut params_refs: Vec<&dyn rusqlite::types::ToSql> = vec![&salon_id];
    for id in ids {
        params_refs.push(id);
    }
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_service_row(row)))?;

    let mut services = vec![];
    for row in rows {
        services.push(row??);
    }
    Ok(services)
}

// ── Bookings ──

const BOOKING_COLS: &str = "id, user_id, salon_id, booking_date, booking_time, status, \
     total_amount, payment_method, payment_status, notes, confirmation_code";

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let date: String = row.get(3)?;
    let time: String = row.get(4)?;
    let status: String = row.get(5)?;
    let total: String = row.get(6)?;
    let method: String = row.get(7)?;
    let payment_status: String = row.get(8)?;

    Ok(Booking {
        id: row.get(0)?,
        user_id: row.get(1)?,
        salon_id: row.get(2)?,
        booking_date: NaiveDate::parse_from_str(&date, DATE_FMT)
            .unwrap_or_else(|_| Utc::now().date_naive()),
        booking_time: NaiveTime::parse_from_str(&time, TIME_FMT)
            .unwrap_or_else(|_| NaiveTime::MIN),
        status: BookingStatus::parse(&status).unwrap_or(BookingStatus::Pending),
        total_amount: parse_decimal(&total),
        payment_method: PaymentMethod::parse(&method).unwrap_or(PaymentMethod::AtShop),
        payment_status: PaymentStatus::parse(&payment_status).unwrap_or(PaymentStatus::Pending),
        notes: row.get(9)?,
        confirmation_code: row.get::<_, Option<String>>(10)?.unwrap_or_default(),
    })
}

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    let now = now_str();
    conn.execute(
        &format!(
            "INSERT INTO bookings ({BOOKING_COLS}, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)"
        ),
        params![
            booking.id,
            booking.user_id,
            booking.salon_id,
            booking.booking_date.format(DATE_FMT).to_string(),
            booking.booking_time.format(TIME_FMT).to_string(),
            booking.status.as_str(),
            booking.total_amount.to_string(),
            booking.payment_method.as_str(),
            booking.payment_status.as_str(),
            booking.notes,
            booking.confirmation_code,
            now,
        ],
    )?;
    Ok(())
}

pub fn insert_booking_line(conn: &Connection, line: &BookingServiceLine) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO booking_services (id, booking_id, service_id, quantity, price, subtotal)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            line.id,
            line.booking_id,
            line.service_id,
            line.quantity,
            line.price.to_string(),
            line.subtotal.to_string(),
        ],
    )?;
    Ok(())
}

pub fn slot_taken(
    conn: &Connection,
    salon_id: &str,
    date: &NaiveDate,
    time: &NaiveTime,
) -> anyhow::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings
         WHERE salon_id = ?1 AND booking_date = ?2 AND booking_time = ?3
           AND status IN ('pending', 'confirmed')",
        params![
            salon_id,
            date.format(DATE_FMT).to_string(),
            time.format(TIME_FMT).to_string()
        ],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn get_booking_for_user(
    conn: &Connection,
    id: &str,
    user_id: &str,
) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLS} FROM bookings WHERE id = ?1 AND user_id = ?2"),
        params![id, user_id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_bookings_for_user(
    conn: &Connection,
    user_id: &str,
    status: Option<BookingStatus>,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Booking>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status {
        Some(status) => (
            format!(
                "SELECT {BOOKING_COLS} FROM bookings WHERE user_id = ?1 AND status = ?2
                 ORDER BY booking_date DESC, booking_time DESC LIMIT ?3 OFFSET ?4"
            ),
            vec![
                Box::new(user_id.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(status.as_str()),
                Box::new(limit),
                Box::new(offset),
            ],
        ),
        None => (
            format!(
                "SELECT {BOOKING_COLS} FROM bookings WHERE user_id = ?1
                 ORDER BY booking_date DESC, booking_time DESC LIMIT ?2 OFFSET ?3"
            ),
            vec![
                Box::new(user_id.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
                Box::new(offset),
            ],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn count_bookings_for_user(
    conn: &Connection,
    user_id: &str,
    status: Option<BookingStatus>,
) -> anyhow::Result<i64> {
    let count = match status {
        Some(status) => conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE user_id = ?1 AND status = ?2",
            params![user_id, status.as_str()],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM bookings WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?,
    };
    Ok(count)
}

pub fn update_booking_status(
    conn: &Connection,
    id: &str,
    status: BookingStatus,
    payment_status: Option<PaymentStatus>,
) -> anyhow::Result<bool> {
    let count = match payment_status {
        Some(ps) => conn.execute(
            "UPDATE bookings SET status = ?1, payment_status = ?2, updated_at = ?3 WHERE id = ?4",
            params![status.as_str(), ps.as_str(), now_str(), id],
        )?,
        None => conn.execute(
            "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), now_str(), id],
        )?,
    };
    Ok(count > 0)
}

pub fn update_booking_payment(
    conn: &Connection,
    id: &str,
    method: PaymentMethod,
    payment_status: PaymentStatus,
    status: Option<BookingStatus>,
) -> anyhow::Result<bool> {
    let count = match status {
        Some(status) => conn.execute(
            "UPDATE bookings SET payment_method = ?1, payment_status = ?2, status = ?3,
                 updated_at = ?4 WHERE id = ?5",
            params![
                method.as_str(),
                payment_status.as_str(),
                status.as_str(),
                now_str(),
                id
            ],
        )?,
        None => conn.execute(
            "UPDATE bookings SET payment_method = ?1, payment_status = ?2, updated_at = ?3
             WHERE id = ?4",
            params![method.as_str(), payment_status.as_str(), now_str(), id],
        )?,
    };
    Ok(count > 0)
}

/// Booking line joined with the catalog fields clients need to render it.
pub struct BookingLineDetail {
    pub line: BookingServiceLine,
    pub service_name: String,
    pub duration: i64,
    pub category: String,
    pub gender: Gender,
}

pub fn get_booking_lines(
    conn: &Connection,
    booking_id: &str,
) -> anyhow::Result<Vec<BookingLineDetail>> {
    let mut stmt = conn.prepare(
        "SELECT bs.id, bs.booking_id, bs.service_id, bs.quantity, bs.price, bs.subtotal,
                s.name, s.duration, s.category, s.gender
         FROM booking_services bs
         INNER JOIN services s ON s.id = bs.service_id
         WHERE bs.booking_id = ?1
         ORDER BY bs.rowid ASC",
    )?;

    let rows = stmt.query_map(params![booking_id], |row| {
        let price: String = row.get(4)?;
        let subtotal: String = row.get(5)?;
        let gender: String = row.get(9)?;
        Ok(BookingLineDetail {
            line: BookingServiceLine {
                id: row.get(0)?,
                booking_id: row.get(1)?,
                service_id: row.get(2)?,
                quantity: row.get(3)?,
                price: parse_decimal(&price),
                subtotal: parse_decimal(&subtotal),
            },
            service_name: row.get(6)?,
            duration: row.get(7)?,
            category: row.get(8)?,
            gender: Gender::parse(&gender),
        })
    })?;

    let mut lines = vec![];
    for row in rows {
        lines.push(row?);
    }
    Ok(lines)
}

// ── Payments ──

fn parse_payment_row(row: &rusqlite::Row) -> anyhow::Result<Payment> {
    let amount: String = row.get(2)?;
    let method: String = row.get(3)?;
    let status: String = row.get(4)?;
    let gateway_response: Option<String> = row.get(6)?;
    let paid_at: Option<String> = row.get(7)?;

    Ok(Payment {
        id: row.get(0)?,
        booking_id: row.get(1)?,
        amount: parse_decimal(&amount),
        payment_method: PaymentMethod::parse(&method).unwrap_or(PaymentMethod::Online),
        status: PaymentState::parse(&status).unwrap_or(PaymentState::Pending),
        transaction_id: row.get(5)?,
        gateway_response: gateway_response.and_then(|s| serde_json::from_str(&s).ok()),
        paid_at: paid_at.map(|s| parse_datetime(&s)),
    })
}

pub fn insert_payment(conn: &Connection, payment: &Payment) -> anyhow::Result<()> {
    let gateway_response = payment
        .gateway_response
        .as_ref()
        .map(|v| v.to_string());
    let paid_at = payment
        .paid_at
        .map(|dt| dt.format(DATETIME_FMT).to_string());

    conn.execute(
        "INSERT INTO payments (id, booking_id, amount, payment_method, status, transaction_id,
             gateway_response, paid_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            payment.id,
            payment.booking_id,
            payment.amount.to_string(),
            payment.payment_method.as_str(),
            payment.status.as_str(),
            payment.transaction_id,
            gateway_response,
            paid_at,
        ],
    )?;
    Ok(())
}

pub fn get_latest_payment_for_booking(
    conn: &Connection,
    booking_id: &str,
) -> anyhow::Result<Option<Payment>> {
    let result = conn.query_row(
        "SELECT id, booking_id, amount, payment_method, status, transaction_id,
                gateway_response, paid_at
         FROM payments WHERE booking_id = ?1
         ORDER BY created_at DESC, rowid DESC LIMIT 1",
        params![booking_id],
        |row| Ok(parse_payment_row(row)),
    );

    match result {
        Ok(payment) => Ok(Some(payment?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
