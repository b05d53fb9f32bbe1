use chrono::{Duration, NaiveDateTime, Utc};
use rand::Rng;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Otp, User};

const OTP_TTL_MINUTES: i64 = 10;
const MAX_VERIFY_ATTEMPTS: i64 = 3;

pub struct IssuedOtp {
    pub expires_at: NaiveDateTime,
    pub code: String,
}

fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

fn validate_phone(phone: &str) -> Result<(), AppError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.len() < 7 || digits.len() > 15 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Invalid phone number".to_string(),
        ));
    }
    Ok(())
}

/// Issue a fresh OTP for the phone, invalidating any prior unused codes.
/// The code itself is delivered out-of-band; callers only get it back for
/// the dev escape hatch.
pub fn send_otp(conn: &Connection, phone: &str) -> Result<IssuedOtp, AppError> {
    validate_phone(phone)?;

    let code = generate_code();
    let expires_at = Utc::now().naive_utc() + Duration::minutes(OTP_TTL_MINUTES);

    queries::invalidate_unused_otps(conn, phone).map_err(AppError::Internal)?;
    queries::create_otp(
        conn,
        &Otp {
            id: Uuid::new_v4().to_string(),
            phone_number: phone.to_string(),
            code: code.clone(),
            expires_at,
            is_used: false,
            attempts: 0,
        },
    )
    .map_err(AppError::Internal)?;

    tracing::info!(phone = %phone, "OTP issued");

    Ok(IssuedOtp { expires_at, code })
}

/// Verify the most recent unused OTP for the phone and upsert the user.
/// Expiry is checked before code match so an expired code reads as expired,
/// not invalid; wrong codes burn one of the three allowed attempts.
pub fn verify_otp(conn: &Connection, phone: &str, code: &str) -> Result<User, AppError> {
    validate_phone(phone)?;

    let otp = queries::get_latest_unused_otp(conn, phone)
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::Validation("Invalid OTP".to_string()))?;

    if Utc::now().naive_utc() > otp.expires_at {
        return Err(AppError::Validation("OTP expired".to_string()));
    }

    if otp.attempts >= MAX_VERIFY_ATTEMPTS {
        return Err(AppError::Validation(
            "Too many failed attempts".to_string(),
        ));
    }

    if otp.code != code {
        queries::increment_otp_attempts(conn, &otp.id).map_err(AppError::Internal)?;
        return Err(AppError::Validation("Invalid OTP".to_string()));
    }

    queries::mark_otp_used(conn, &otp.id).map_err(AppError::Internal)?;

    let user = match queries::get_user_by_phone(conn, phone).map_err(AppError::Internal)? {
        Some(user) => {
            queries::touch_user_login(conn, &user.id).map_err(AppError::Internal)?;
            User {
                is_verified: true,
                last_login_at: Some(Utc::now().naive_utc()),
                ..user
            }
        }
        None => {
            let user = User {
                id: Uuid::new_v4().to_string(),
                phone_number: phone.to_string(),
                name: None,
                email: None,
                is_verified: true,
                last_login_at: Some(Utc::now().naive_utc()),
            };
            queries::create_user(conn, &user).map_err(AppError::Internal)?;
            user
        }
    };

    tracing::info!(phone = %phone, user_id = %user.id, "user logged in");

    Ok(user)
}
