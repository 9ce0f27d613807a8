//! Health check endpoint

use aftercare_common::envelope::HealthResponse;
use axum::response::Json;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "Aftercare Backend API";

/// GET /health
///
/// Always 200 while the process is alive; database and cache state do
/// not affect it.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok(SERVICE_NAME))
}
