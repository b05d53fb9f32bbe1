pub mod auth;
pub mod bookings;
pub mod health;
pub mod payments;
pub mod salons;

use axum::http::HeaderMap;

use crate::errors::AppError;
use crate::services::token::Claims;
use crate::state::AppState;

/// Resolve the bearer credential on a protected route into session claims.
pub fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Claims, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let credential = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;
    state.tokens.verify(credential)
}
