pub mod login;
pub mod password;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::models::auth::requests::{
    ChangePasswordRequest, LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest,
    RefreshTokenRequest,
};

crate::services::lazy_service!(AuthService);

impl AuthService {
    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(
        &self,
        body: Option<RefreshTokenRequest>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, body, request).await
    }

    // 当前用户信息
    pub async fn get_user(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_user(self, request).await
    }

    // 修改密码
    pub async fn change_password(
        &self,
        change_request: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_password(self, change_request, request).await
    }

    // 申请密码重置
    pub async fn request_password_reset(
        &self,
        reset_request: PasswordResetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_password_reset(self, reset_request, request).await
    }

    // 确认密码重置
    pub async fn confirm_password_reset(
        &self,
        confirm_request: PasswordResetConfirmRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_password_reset_confirm(self, confirm_request, request).await
    }
}
