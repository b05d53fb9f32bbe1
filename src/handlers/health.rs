use axum::Json;
use chrono::Utc;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "Server is healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
