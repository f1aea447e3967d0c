use serde::Serialize;
use ts_rs::TS;

/// 健康检查响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub latency_ms: u64,
    pub version: String,
    pub mode: String,
    pub uptime_seconds: i64,
}
