//! 报名管理
//!
//! 职员可查看与维护全部报名，学员只能看到自己的报名。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::errors::InstituteError;
use crate::models::enrollments::requests::{
    CreateEnrollmentRequest, EnrollmentListParams, EnrollmentListQuery, UpdateEnrollmentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Caller, not_found, resolve_caller, storage_error_response};

pub async fn list_enrollments(
    service: &EnrollmentService,
    query: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let mut list_query = EnrollmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        status: query.status,
        course_id: query.course_id,
        student_id: query.student_id,
        search: query.search,
    };

    match caller {
        Caller::Staff(_) => {}
        Caller::Student(_, student) => list_query.student_id = Some(student.id),
        // 未建档的学员没有报名
        Caller::Other(_) => list_query.student_id = Some(-1),
    }

    match storage.list_enrollments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Enrollment list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_enrollment(
    service: &EnrollmentService,
    data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.create_enrollment(data).await {
        Ok(enrollment) => {
            let detail = match storage.get_enrollment_by_id(enrollment.id).await {
                Ok(Some(detail)) => detail,
                Ok(None) => {
                    return Ok(not_found(
                        ErrorCode::EnrollmentNotFound,
                        "Enrollment not found.",
                    ));
                }
                Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
            };
            Ok(HttpResponse::Created().json(ApiResponse::success(
                detail,
                "Enrollment created successfully",
            )))
        }
        Err(e) => {
            let code = create_error_code(&e);
            Ok(storage_error_response(e, code))
        }
    }
}

/// 按失败原因选择业务码
fn create_error_code(err: &InstituteError) -> ErrorCode {
    match err {
        InstituteError::Validation(msg) if msg.contains("capacity") => {
            ErrorCode::BatchCapacityReached
        }
        InstituteError::Validation(msg) if msg.contains("already enrolled") => {
            ErrorCode::EnrollmentDuplicate
        }
        InstituteError::Conflict(_) => ErrorCode::EnrollmentDuplicate,
        _ => ErrorCode::BatchInvalid,
    }
}

pub async fn get_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    match storage.get_enrollment_by_id(enrollment_id).await {
        Ok(Some(detail)) if caller.can_access_student(detail.enrollment.student_id) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Enrollment retrieved successfully",
            )))
        }
        Ok(_) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::EnrollmentNotFound)),
    }
}

pub async fn update_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    data: UpdateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.update_enrollment(enrollment_id, data).await {
        Ok(Some(enrollment)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            enrollment,
            "Enrollment updated successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::BatchInvalid)),
    }
}

pub async fn delete_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_enrollment(enrollment_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Enrollment deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::EnrollmentNotFound)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_error_code() {
        assert_eq!(
            create_error_code(&InstituteError::validation("Batch capacity reached.")),
            ErrorCode::BatchCapacityReached
        );
        assert_eq!(
            create_error_code(&InstituteError::validation(
                "Student already enrolled in this course."
            )),
            ErrorCode::EnrollmentDuplicate
        );
        assert_eq!(
            create_error_code(&InstituteError::validation("Selected batch does not exist.")),
            ErrorCode::BatchInvalid
        );
    }
}
