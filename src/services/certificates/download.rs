use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::error;

use super::CertificateService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::documents::{ensure_certificate_pdf, pdf_response};
use crate::services::{forbidden, not_found, resolve_caller, storage_error_response};
use crate::utils::pdf::attachment_name;

/// 本人或职员下载，文件缺失时重新生成
pub async fn download_certificate(
    service: &CertificateService,
    certificate_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let detail = match storage.get_certificate_by_id(certificate_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => {
            return Ok(not_found(
                ErrorCode::CertificateNotFound,
                "Certificate not found.",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    if !caller.can_access_student(detail.certificate.student_id) {
        return Ok(forbidden());
    }

    match ensure_certificate_pdf(&storage, &detail).await {
        Ok(bytes) => Ok(pdf_response(
            bytes,
            attachment_name("certificate", &detail.certificate.certificate_no),
        )),
        Err(e) => {
            error!(
                "Failed to provide certificate {}: {}",
                detail.certificate.certificate_no, e
            );
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::DocumentUnavailable,
                    "Certificate document is unavailable.",
                )),
            )
        }
    }
}
