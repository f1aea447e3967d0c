use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::requests::RefreshTokenRequest;
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{storage_error_response, unauthorized};
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn refresh_rejected() -> HttpResponse {
    // 清除无效的 refresh token cookie
    let empty_cookie = JwtUtils::create_refresh_token_cookie("", chrono::Duration::zero());
    HttpResponse::Unauthorized()
        .cookie(empty_cookie)
        .json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Login expired or invalid, please login again",
        ))
}

/// refresh token 优先取 cookie，其次取请求体
pub async fn handle_refresh_token(
    service: &AuthService,
    body: Option<RefreshTokenRequest>,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request)
        .filter(|token| !token.is_empty())
        .or_else(|| body.and_then(|b| b.refresh_token))
    else {
        return Ok(unauthorized());
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(refresh_rejected());
        }
    };

    let Ok(user_id) = claims.sub.parse::<i64>() else {
        return Ok(refresh_rejected());
    };

    // 停用账号不再签发
    let storage = service.get_storage(request);
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(refresh_rejected()),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    match JwtUtils::generate_access_token(user.id, &user.role.to_string()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            warn!("Failed to generate access token: {}", e);
            Ok(refresh_rejected())
        }
    }
}

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };

    let storage = service.get_storage(request);
    let student_id = match storage.get_student_by_user_id(user.id).await {
        Ok(student) => student.map(|s| s.id),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user, student_id },
        "User information retrieved successfully",
    )))
}
