use actix_web::{get, web, HttpResponse, Result};

use crate::services::HealthService;

/// Liveness plus a storage round trip; 503 when the store does not answer.
#[get("/health")]
pub async fn health_check(health: web::Data<HealthService>) -> Result<HttpResponse> {
    let report = health.check().await;

    if report.is_healthy() {
        Ok(HttpResponse::Ok().json(report))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(report))
    }
}
