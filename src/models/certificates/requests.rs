use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;
use crate::models::common::query::{deserialize_optional_bool, deserialize_optional_i64};

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "certificate.ts")]
pub struct CreateCertificateRequest {
    pub student_id: i64,
    pub course_id: i64,
    pub issue_date: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "certificate.ts")]
pub struct UpdateCertificateRequest {
    pub remarks: Option<String>,
    pub issue_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "certificate.ts")]
pub struct CertificateListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub revoked: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CertificateListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub revoked: Option<bool>,
    pub search: Option<String>,
}
