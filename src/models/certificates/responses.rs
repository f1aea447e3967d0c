use serde::Serialize;
use ts_rs::TS;

use super::entities::CertificateDetail;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "certificate.ts")]
pub struct CertificateListResponse {
    pub items: Vec<CertificateDetail>,
    pub pagination: PaginationInfo,
}
