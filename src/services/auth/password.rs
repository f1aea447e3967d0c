use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use crate::middlewares::RequireJWT;
use crate::models::auth::requests::{
    ChangePasswordRequest, PasswordResetConfirmRequest, PasswordResetRequest,
};
use crate::models::users::entities::UserStatus;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, internal_error, storage_error_response, unauthorized};
use crate::utils::jwt::JwtUtils;
use crate::utils::mail::{password_reset_body, send_mail};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::validate_password_simple;

use super::AuthService;

const INVALID_RESET_LINK: &str = "Invalid or expired reset link";

// 校验密码策略并哈希
fn prepare_new_password(password: &str) -> Result<String, HttpResponse> {
    if let Err(msg) = validate_password_simple(password) {
        return Err(bad_request(ErrorCode::PasswordPolicyViolation, msg));
    }
    hash_password(password).map_err(|e| {
        error!("Password hashing failed: {}", e);
        internal_error()
    })
}

fn password_only(hash: String) -> UpdateUserRequest {
    UpdateUserRequest {
        password: Some(hash),
        ..Default::default()
    }
}

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    if !verify_password(&change_request.old_password, &user.password_hash) {
        return Ok(bad_request(
            ErrorCode::OldPasswordIncorrect,
            "Old password is incorrect.",
        ));
    }

    let hash = match prepare_new_password(&change_request.new_password) {
        Ok(hash) => hash,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);
    match storage.update_user(user.id, password_only(hash)).await {
        Ok(Some(_)) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Password updated successfully.",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::UserNotFound)),
    }
}

/// 向有效邮箱发送重置链接 `{frontend}/reset-password/{uid}/{token}/`
pub async fn handle_password_reset(
    service: &AuthService,
    reset_request: PasswordResetRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let email = reset_request.email.trim().to_lowercase();

    let user = match storage.get_user_by_email(&email).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => {
            return Ok(bad_request(
                ErrorCode::UserEmailInvalid,
                "No active user found with this email.",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    let token = match JwtUtils::generate_password_reset_token(
        user.id,
        &user.role.to_string(),
        &user.password_hash,
    ) {
        Ok(token) => token,
        Err(e) => {
            error!("Failed to generate password reset token: {}", e);
            return Ok(internal_error());
        }
    };

    let link = format!(
        "{}/reset-password/{}/{}/",
        config.frontend_base(),
        user.id,
        token
    );
    let body = password_reset_body(&user.full_name(), &link, &config.institute.name);
    let subject = format!("{} password reset", config.institute.name);

    match send_mail(&user.email, &subject, &body).await {
        Ok(outcome) => {
            info!("Password reset link issued for user {} ({:?})", user.id, outcome);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password reset link has been sent to your email.",
            )))
        }
        Err(e) => {
            error!("Password reset mail failed for user {}: {}", user.id, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::MailSendFailed,
                    "Error sending email",
                )),
            )
        }
    }
}

pub async fn handle_password_reset_confirm(
    service: &AuthService,
    confirm_request: PasswordResetConfirmRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let invalid = || bad_request(ErrorCode::PasswordResetInvalid, INVALID_RESET_LINK);

    let Ok(user_id) = confirm_request.uid.trim().parse::<i64>() else {
        return Ok(invalid());
    };

    let storage = service.get_storage(request);
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(invalid()),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    // 令牌绑定旧密码指纹，使用一次后即失效
    if !JwtUtils::verify_password_reset_token(&confirm_request.token, user.id, &user.password_hash)
    {
        return Ok(invalid());
    }

    let hash = match prepare_new_password(&confirm_request.new_password) {
        Ok(hash) => hash,
        Err(resp) => return Ok(resp),
    };

    match storage.update_user(user.id, password_only(hash)).await {
        Ok(Some(_)) => {
            info!("Password reset completed for user {}", user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Password has been reset successfully.",
            )))
        }
        Ok(None) => Ok(invalid()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
