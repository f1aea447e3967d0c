use serde::Serialize;
use ts_rs::TS;

use super::entities::EnrollmentDetail;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentListResponse {
    pub items: Vec<EnrollmentDetail>,
    pub pagination: PaginationInfo,
}
