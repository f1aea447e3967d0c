//! 财务统计与欠费

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{forbidden, not_found, resolve_caller, storage_error_response};

pub async fn finance_analytics(
    service: &FinanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_finance_analytics().await {
        Ok(analytics) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            analytics,
            "Finance analytics retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

/// 职员或学员本人
pub async fn student_outstanding(
    service: &FinanceService,
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

    match storage.get_student_outstanding(student_id).await {
        Ok(Some(outstanding)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            outstanding,
            "Outstanding fees retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn course_outstanding(
    service: &FinanceService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_course_outstanding(course_id).await {
        Ok(Some(outstanding)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            outstanding,
            "Outstanding fees retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn overall_outstanding(
    service: &FinanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_overall_outstanding().await {
        Ok(outstanding) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            outstanding,
            "Outstanding fees retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
