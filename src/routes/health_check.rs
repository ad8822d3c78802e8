use actix_web::HttpResponse;

use super::payloads::HealthStatus;

#[tracing::instrument(
    "Checking if api is online"
)]
pub async fn health_check() -> HttpResponse{
    HttpResponse::Ok().json(HealthStatus{ status: "ok".to_string() })
}
