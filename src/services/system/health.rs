use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::time::Instant;
use tracing::warn;

use super::SystemService;
use crate::models::system::HealthResponse;
use crate::models::{ApiResponse, AppStartTime, ErrorCode};

/// 服务与数据库状态，数据库不可用时返回 503
pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let started = Instant::now();
    let ping = storage.ping().await;
    let latency_ms = started.elapsed().as_millis() as u64;

    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or_default();

    let (status, database) = match &ping {
        Ok(()) => ("ok", "connected".to_string()),
        Err(e) => {
            warn!("Health check database ping failed: {}", e);
            ("degraded", format!("error: {}", e.message()))
        }
    };

    let response = HealthResponse {
        status: status.to_string(),
        database,
        latency_ms,
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: config.app.environment.clone(),
        uptime_seconds,
    };

    if ping.is_ok() {
        Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
    } else {
        Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error(
            ErrorCode::InternalServerError,
            response,
            "Database is unavailable",
        )))
    }
}
