use actix_web::HttpResponse;

/// Liveness probe
///
/// GET /health
pub async fn health_check() -> HttpResponse {
  HttpResponse::Ok().body("OK")
}
