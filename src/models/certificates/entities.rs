use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const CERTIFICATE_ALREADY_ISSUED: &str =
    "An active certificate already exists for this student and course.";

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "certificate.ts")]
pub struct Certificate {
    pub id: i64,
    pub certificate_no: String,
    pub student_id: i64,
    pub course_id: i64,
    pub issue_date: NaiveDate,
    pub qr_hash: String,
    pub remarks: String,
    pub revoked: bool,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub pdf_path: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Certificate {
    pub fn has_pdf(&self) -> bool {
        self.pdf_path.is_some()
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "certificate.ts")]
pub struct CertificateDetail {
    pub certificate: Certificate,
    pub student_name: String,
    pub reg_no: Option<String>,
    pub course_code: String,
    pub course_title: String,
    pub duration_weeks: i32,
    pub has_pdf: bool,
}

/// 公开校验结果
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "certificate.ts")]
pub struct CertificateVerification {
    pub valid: bool,
    pub certificate_no: Option<String>,
    pub student_name: Option<String>,
    pub reg_no: Option<String>,
    pub course_title: Option<String>,
    pub issue_date: Option<NaiveDate>,
}

impl CertificateVerification {
    pub fn invalid() -> Self {
        Self {
            valid: false,
            certificate_no: None,
            student_name: None,
            reg_no: None,
            course_title: None,
            issue_date: None,
        }
    }

    pub fn from_detail(detail: &CertificateDetail) -> Self {
        Self {
            valid: true,
            certificate_no: Some(detail.certificate.certificate_no.clone()),
            student_name: Some(detail.student_name.clone()),
            reg_no: detail.reg_no.clone(),
            course_title: Some(detail.course_title.clone()),
            issue_date: Some(detail.certificate.issue_date),
        }
    }
}
