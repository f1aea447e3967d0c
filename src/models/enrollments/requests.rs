use serde::Deserialize;
use ts_rs::TS;

use super::entities::EnrollmentStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_i64;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub course_id: i64,
    pub batch_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct UpdateEnrollmentRequest {
    pub status: Option<EnrollmentStatus>,
    pub batch_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<EnrollmentStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EnrollmentListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    pub course_id: Option<i64>,
    pub student_id: Option<i64>,
    pub search: Option<String>,
}
