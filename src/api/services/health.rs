use std::sync::Arc;
use std::time::Duration;

use actix_web::{HttpResponse, web};
use tracing::error;

use crate::storage::SeaOrmStorage;

use super::types::HealthStatus;

pub async fn liveness_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok",
        database: None,
    })
}

/// 就绪检查：数据库可用
pub async fn readiness_check(storage: web::Data<Arc<SeaOrmStorage>>) -> HttpResponse {
    match tokio::time::timeout(Duration::from_secs(5), storage.ping()).await {
        Ok(Ok(())) => HttpResponse::Ok().json(HealthStatus {
            status: "ok",
            database: Some(storage.get_backend_name().to_string()),
        }),
        Ok(Err(e)) => {
            error!("Readiness check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(HealthStatus {
                status: "unavailable",
                database: None,
            })
        }
        Err(_) => {
            error!("Readiness check timed out");
            HttpResponse::ServiceUnavailable().json(HealthStatus {
                status: "unavailable",
                database: None,
            })
        }
    }
}

pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("/live", web::get().to(liveness_check))
        .route("/live", web::head().to(liveness_check))
        .route("/ready", web::get().to(readiness_check))
        .route("/ready", web::head().to(readiness_check))
}
