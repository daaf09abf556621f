//! Health check endpoint.

use actix_web::HttpResponse;
use scribe_shared::dto::HealthResponse;

/// Liveness only; no dependency is probed.
///
/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
    })
}
