pub mod download;
pub mod handlers;
pub mod verify;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::certificates::requests::{
    CertificateListParams, CreateCertificateRequest, UpdateCertificateRequest,
};

crate::services::lazy_service!(CertificateService);

impl CertificateService {
    pub async fn list_certificates(
        &self,
        query: CertificateListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::list_certificates(self, query, request).await
    }

    pub async fn create_certificate(
        &self,
        data: CreateCertificateRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::create_certificate(self, data, request).await
    }

    pub async fn get_certificate(
        &self,
        certificate_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::get_certificate(self, certificate_id, request).await
    }

    pub async fn update_certificate(
        &self,
        certificate_id: i64,
        data: UpdateCertificateRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::update_certificate(self, certificate_id, data, request).await
    }

    pub async fn delete_certificate(
        &self,
        certificate_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::delete_certificate(self, certificate_id, request).await
    }

    pub async fn toggle_revoked(
        &self,
        certificate_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::toggle_revoked(self, certificate_id, request).await
    }

    pub async fn my_certificates(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::my_certificates(self, request).await
    }

    pub async fn download_certificate(
        &self,
        certificate_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        download::download_certificate(self, certificate_id, request).await
    }

    pub async fn verify_certificate(
        &self,
        qr_hash: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        verify::verify_certificate(self, qr_hash, request).await
    }
}
