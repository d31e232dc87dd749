use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: String,
    pub version: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "squad-forge API running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
