use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::auth::requests::{
    ChangePasswordRequest, LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest,
    RefreshTokenRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

// 请求体可省略，此时从 Cookie 读取刷新令牌
pub async fn refresh_token(
    request: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .refresh_token(body.map(|b| b.into_inner()), &request)
        .await
}

pub async fn get_user(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_user(&request).await
}

pub async fn change_password(
    request: HttpRequest,
    body: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .change_password(body.into_inner(), &request)
        .await
}

pub async fn request_password_reset(
    request: HttpRequest,
    body: web::Json<PasswordResetRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .request_password_reset(body.into_inner(), &request)
        .await
}

pub async fn confirm_password_reset(
    request: HttpRequest,
    body: web::Json<PasswordResetConfirmRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .confirm_password_reset(body.into_inner(), &request)
        .await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(middlewares::RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(middlewares::RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .service(
                web::resource("/password-reset")
                    .wrap(middlewares::RateLimit::password_reset())
                    .route(web::post().to(request_password_reset)),
            )
            .service(
                web::resource("/password-reset/confirm")
                    .wrap(middlewares::RateLimit::password_reset())
                    .route(web::post().to(confirm_password_reset)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/me", web::get().to(get_user))
                    .route("/me/password", web::post().to(change_password)),
            ),
    );
}
