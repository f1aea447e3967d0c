use serde::Serialize;
use ts_rs::TS;

use super::entities::AttendanceRecordDetail;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<AttendanceRecordDetail>,
    pub pagination: PaginationInfo,
}
