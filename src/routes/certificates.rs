use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::certificates::requests::{
    CertificateListParams, CreateCertificateRequest, UpdateCertificateRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CertificateService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CertificateService 实例
static CERTIFICATE_SERVICE: Lazy<CertificateService> = Lazy::new(CertificateService::new_lazy);

pub async fn list_certificates(
    req: HttpRequest,
    query: web::Query<CertificateListParams>,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .list_certificates(query.into_inner(), &req)
        .await
}

pub async fn create_certificate(
    req: HttpRequest,
    data: web::Json<CreateCertificateRequest>,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .create_certificate(data.into_inner(), &req)
        .await
}

pub async fn get_certificate(
    req: HttpRequest,
    certificate_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .get_certificate(certificate_id.0, &req)
        .await
}

pub async fn update_certificate(
    req: HttpRequest,
    certificate_id: SafeIDI64,
    data: web::Json<UpdateCertificateRequest>,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .update_certificate(certificate_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_certificate(
    req: HttpRequest,
    certificate_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .delete_certificate(certificate_id.0, &req)
        .await
}

pub async fn toggle_revoked(
    req: HttpRequest,
    certificate_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .toggle_revoked(certificate_id.0, &req)
        .await
}

pub async fn my_certificates(req: HttpRequest) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE.my_certificates(&req).await
}

pub async fn download_certificate(
    req: HttpRequest,
    certificate_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .download_certificate(certificate_id.0, &req)
        .await
}

// 格式错误的令牌同样按未知证书处理
pub async fn verify_certificate(
    req: HttpRequest,
    qr_hash: web::Path<String>,
) -> ActixResult<HttpResponse> {
    CERTIFICATE_SERVICE
        .verify_certificate(&qr_hash.into_inner(), &req)
        .await
}

// 配置路由：校验接口公开，其余需要登录
pub fn configure_certificate_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/certificates")
            .route("/verify/{qr_hash}", web::get().to(verify_certificate))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/my", web::get().to(my_certificates))
                    .route("/{id}/download", web::get().to(download_certificate))
                    .service(
                        web::scope("")
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                            .route("", web::get().to(list_certificates))
                            .route("", web::post().to(create_certificate))
                            .route("/{id}", web::get().to(get_certificate))
                            .route("/{id}", web::put().to(update_certificate))
                            .route("/{id}", web::patch().to(update_certificate))
                            .route("/{id}", web::delete().to(delete_certificate))
                            .route("/{id}/revoke", web::post().to(toggle_revoked)),
                    ),
            ),
    );
}
