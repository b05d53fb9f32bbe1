use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use super::authenticate;
use crate::db::queries;
use crate::errors::AppError;
use crate::services::auth;
use crate::state::AppState;

// POST /auth/send-otp
#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub phone_number: String,
}

pub async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let issued = {
        let db = state.db.lock().unwrap();
        auth::send_otp(&db, &body.phone_number)?
    };

    let mut data = serde_json::json!({
        "expires_at": issued.expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    });
    if state.config.otp_dev_response {
        // Local testing only; production delivers the code out-of-band
        data["otp"] = serde_json::Value::String(issued.code);
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "OTP sent successfully",
        "data": data,
    })))
}

// POST /auth/verify-otp
#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub phone_number: String,
    pub otp: String,
}

pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = {
        let db = state.db.lock().unwrap();
        auth::verify_otp(&db, &body.phone_number, &body.otp)?
    };

    let token = state
        .tokens
        .issue(&user.id, &user.phone_number)
        .map_err(AppError::Internal)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Login successful",
        "data": {
            "token": token,
            "user": {
                "id": user.id,
                "phone_number": user.phone_number,
                "name": user.name,
                "email": user.email,
            },
        },
    })))
}

// GET /auth/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = authenticate(&headers, &state)?;

    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_id(&db, &claims.user_id)
            .map_err(AppError::Internal)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "user": user },
    })))
}

// PUT /auth/profile
#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let claims = authenticate(&headers, &state)?;

    let user = {
        let db = state.db.lock().unwrap();
        let updated = queries::update_user_profile(
            &db,
            &claims.user_id,
            body.name.as_deref(),
            body.email.as_deref(),
        )
        .map_err(AppError::Internal)?;
        if !updated {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        queries::get_user_by_id(&db, &claims.user_id)
            .map_err(AppError::Internal)?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Profile updated successfully",
        "data": {
            "user": {
                "id": user.id,
                "phone_number": user.phone_number,
                "name": user.name,
                "email": user.email,
            },
        },
    })))
}
