// src/handlers/health.rs
// DOCUMENTATION: Health check handler
// PURPOSE: Verify the service and its record store are answering

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;
use sqlx::SqlitePool;

/// GET /health
/// Liveness plus a record-store ping; degraded answers get a 503 so
/// batch tooling can bail out before uploading anything
pub async fn health_check(pool: web::Data<SqlitePool>) -> impl Responder {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "service": "photodesk",
            "version": env!("CARGO_PKG_VERSION"),
            "database": "reachable"
        })),
        Err(e) => {
            log::error!("Health check could not reach the database: {}", e);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "degraded",
                "service": "photodesk",
                "version": env!("CARGO_PKG_VERSION"),
                "database": "unreachable"
            }))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
