use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::{UserService, is_assignable_role};
use crate::models::{
    ApiResponse, ErrorCode,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, internal_error, storage_error_response};
use crate::utils::password::hash_password;
use crate::utils::validate::{
    validate_email, validate_password_simple, validate_phone, validate_username,
};

/// 校验新用户的字段，返回首个错误
pub(crate) fn validate_new_user(user: &CreateUserRequest) -> Result<(), HttpResponse> {
    if let Err(msg) = validate_username(&user.username) {
        return Err(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&user.email) {
        return Err(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_phone(&user.phone) {
        return Err(bad_request(ErrorCode::BadRequest, msg));
    }
    if let Err(msg) = validate_password_simple(&user.password) {
        return Err(bad_request(ErrorCode::PasswordPolicyViolation, msg));
    }
    Ok(())
}

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !is_assignable_role(&user_data.role) {
        return Ok(bad_request(
            ErrorCode::UserRoleInvalid,
            "Role must be student or staff.",
        ));
    }

    if let Err(resp) = validate_new_user(&user_data) {
        return Ok(resp);
    }

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return Ok(internal_error());
        }
    };

    let storage = service.get_storage(request);

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("User {} created with role {}", user.username, user.role);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(UserResponse { user }, "User created successfully")))
        }
        Err(e) => Ok(storage_error_response(e, ErrorCode::UserAlreadyExists)),
    }
}
