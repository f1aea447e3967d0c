use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::StudentService;
use crate::models::students::requests::CreateStudentRequest;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::users::create::validate_new_user;
use crate::services::{bad_request, internal_error, storage_error_response};
use crate::storage::today;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_not_future, validate_phone, validate_required};

pub(crate) fn validate_guardian(name: &str, phone: &str) -> Result<(), HttpResponse> {
    if let Err(msg) = validate_required(name, "Guardian name is required.") {
        return Err(bad_request(ErrorCode::StudentInvalid, msg));
    }
    if let Err(msg) = validate_phone(phone) {
        return Err(bad_request(ErrorCode::StudentInvalid, msg));
    }
    Ok(())
}

/// 学员账号与档案在同一事务中创建，角色固定为 student
pub async fn create_student(
    service: &StudentService,
    mut data: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(payload) = data.user.take() else {
        return Ok(bad_request(ErrorCode::StudentInvalid, "User data is required."));
    };

    let mut user = CreateUserRequest {
        username: payload.username,
        email: payload.email,
        password: payload.password,
        role: UserRole::Student,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        address: payload.address,
    };
    if let Err(resp) = validate_new_user(&user) {
        return Ok(resp);
    }
    if let Err(resp) = validate_guardian(&data.guardian_name, &data.guardian_phone) {
        return Ok(resp);
    }
    if let Some(date) = data.admission_date
        && let Err(msg) = validate_not_future(date, today())
    {
        return Ok(bad_request(ErrorCode::StudentInvalid, msg));
    }

    user.password = match hash_password(&user.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Password hashing failed: {}", e);
            return Ok(internal_error());
        }
    };

    let storage = service.get_storage(request);
    match storage.create_student(user, data).await {
        Ok(detail) => {
            info!(
                "Student {} created (reg_no {:?})",
                detail.student.id, detail.student.reg_no
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                detail,
                "Student created successfully",
            )))
        }
        Err(e) => Ok(storage_error_response(e, ErrorCode::UserAlreadyExists)),
    }
}
