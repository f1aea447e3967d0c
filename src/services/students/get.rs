use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    forbidden, not_found, require_student, resolve_caller, storage_error_response,
};

pub async fn get_student(
    service: &StudentService,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    if !caller.can_access_student(student_id) {
        return Ok(forbidden());
    }

    match storage.get_student_by_id(student_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Student retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::StudentNotFound)),
    }
}

pub async fn get_my_profile(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (_, student) = match require_student(&storage, request).await {
        Ok(pair) => pair,
        Err(resp) => return Ok(resp),
    };

    match storage.get_student_by_id(student.id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Student profile retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::StudentNotFound,
            "Student profile not found for this user.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::StudentNotFound)),
    }
}
