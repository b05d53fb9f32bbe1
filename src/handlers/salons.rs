use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::catalog;
use crate::state::AppState;

// GET /salons
#[derive(Deserialize)]
#[allow(dead_code)]
pub struct SalonsQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    // Accepted for API compatibility; distance filtering is disabled and
    // must not be quietly turned back on.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
}

pub async fn list_salons(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SalonsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(50);

    let salons = {
        let db = state.db.lock().unwrap();
        catalog::list_salons(&db, query.search.as_deref(), page, limit)?
    };

    let total = salons.len();
    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "salons": salons,
            "pagination": { "page": page, "limit": limit, "total": total },
        },
    })))
}

// GET /salons/:id
pub async fn get_salon(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let salon = {
        let db = state.db.lock().unwrap();
        catalog::get_salon_detail(&db, &id)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "salon": salon },
    })))
}

// GET /salons/:id/services
pub async fn get_services(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let services = {
        let db = state.db.lock().unwrap();
        catalog::list_services(&db, &id)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "data": { "services": services },
    })))
}

// GET /salons/:id/slots
#[derive(Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<SlotsQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let grid = {
        let db = state.db.lock().unwrap();
        catalog::available_slots(&db, &id, query.date)?
    };

    Ok(Json(serde_json::json!({
        "success": true,
        "data": grid,
    })))
}
