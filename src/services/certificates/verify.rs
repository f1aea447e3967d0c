use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CertificateService;
use crate::models::certificates::entities::CertificateVerification;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::storage_error_response;
use crate::utils::extractor::parse_uuid_token;

fn invalid_response() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error(
        ErrorCode::CertificateNotFound,
        CertificateVerification::invalid(),
        "Certificate not found or revoked.",
    ))
}

/// 公开校验，未知或已撤销的证书返回 404 与 `valid: false`
pub async fn verify_certificate(
    service: &CertificateService,
    qr_hash: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Ok(qr_hash) = parse_uuid_token(Some(qr_hash), "qr_hash") else {
        return Ok(invalid_response());
    };
    let storage = service.get_storage(request);

    match storage.get_certificate_by_qr_hash(&qr_hash).await {
        Ok(Some(detail)) if !detail.certificate.revoked => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                CertificateVerification::from_detail(&detail),
                "Certificate is valid",
            )))
        }
        Ok(_) => Ok(invalid_response()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::CertificateNotFound)),
    }
}
