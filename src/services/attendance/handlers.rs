//! 考勤记录
//!
//! 保存后对标记为出勤的学员执行结业检查，检查失败只记日志。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};

use super::AttendanceService;
use crate::middlewares::RequireJWT;
use crate::models::attendance::entities::AttendanceStatus;
use crate::models::attendance::requests::{
    AttendanceEntryInput, AttendanceListParams, AttendanceListQuery, CreateAttendanceRequest,
    UpdateAttendanceRequest, find_duplicate_student,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    bad_request, forbidden, not_found, require_student, resolve_caller, storage_error_response,
    unauthorized,
};
use crate::storage::Storage;

fn present_students(entries: &[AttendanceEntryInput]) -> BTreeSet<i64> {
    entries
        .iter()
        .filter(|e| e.status == AttendanceStatus::Present)
        .map(|e| e.student_id)
        .collect()
}

async fn run_completion_checks(storage: &Arc<dyn Storage>, students: BTreeSet<i64>) {
    for student_id in students {
        match storage.check_and_update_status(student_id).await {
            Ok(completed) => {
                for enrollment in completed {
                    info!(
                        "Enrollment {} of student {} completed by attendance",
                        enrollment.id, student_id
                    );
                }
            }
            Err(e) => warn!("Completion check failed for student {}: {}", student_id, e),
        }
    }
}

fn duplicate_response(entries: &[AttendanceEntryInput]) -> Option<HttpResponse> {
    find_duplicate_student(entries).map(|student_id| {
        bad_request(
            ErrorCode::AttendanceInvalid,
            format!("Student {student_id} appears more than once."),
        )
    })
}

pub async fn list_attendance(
    service: &AttendanceService,
    query: AttendanceListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = AttendanceListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        date: query.date,
    };

    match storage.list_attendance_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Attendance list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_attendance(
    service: &AttendanceService,
    data: CreateAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(taken_by) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    if let Some(resp) = duplicate_response(&data.entries) {
        return Ok(resp);
    }

    let storage = service.get_storage(request);
    let present = present_students(&data.entries);

    match storage.create_attendance(taken_by, data).await {
        Ok(detail) => {
            run_completion_checks(&storage, present).await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                detail,
                "Attendance recorded successfully",
            )))
        }
        Err(e) => Ok(storage_error_response(e, ErrorCode::AttendanceInvalid)),
    }
}

pub async fn get_attendance(
    service: &AttendanceService,
    record_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_attendance_by_id(record_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Attendance retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::AttendanceNotFound,
            "Attendance record not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::AttendanceNotFound)),
    }
}

pub async fn update_attendance(
    service: &AttendanceService,
    record_id: i64,
    data: UpdateAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let present = match data.entries.as_deref() {
        Some(entries) => {
            if let Some(resp) = duplicate_response(entries) {
                return Ok(resp);
            }
            present_students(entries)
        }
        None => BTreeSet::new(),
    };

    let storage = service.get_storage(request);
    match storage.update_attendance(record_id, data).await {
        Ok(Some(detail)) => {
            run_completion_checks(&storage, present).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Attendance updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::AttendanceNotFound,
            "Attendance record not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::AttendanceInvalid)),
    }
}

pub async fn delete_attendance(
    service: &AttendanceService,
    record_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_attendance(record_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Attendance deleted successfully",
        ))),
        Ok(false) => Ok(not_found(
            ErrorCode::AttendanceNotFound,
            "Attendance record not found.",
        )),
        Err(e) => Ok(storage_error_response(e, ErrorCode::AttendanceNotFound)),
    }
}

pub async fn my_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (_, student) = match require_student(&storage, request).await {
        Ok(pair) => pair,
        Err(resp) => return Ok(resp),
    };

    match storage.list_student_attendance(student.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Attendance history retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn student_analytics(
    service: &AttendanceService,
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

    match storage.get_student_attendance_analytics(student_id).await {
        Ok(Some(analytics)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            analytics,
            "Attendance analytics retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(student_id: i64, status: AttendanceStatus) -> AttendanceEntryInput {
        AttendanceEntryInput {
            student_id,
            status,
            remarks: String::new(),
        }
    }

    #[test]
    fn test_present_students_only_counts_present() {
        let entries = [
            entry(3, AttendanceStatus::Present),
            entry(1, AttendanceStatus::Absent),
            entry(2, AttendanceStatus::Late),
            entry(1, AttendanceStatus::Present),
        ];
        let present: Vec<i64> = present_students(&entries).into_iter().collect();
        assert_eq!(present, vec![1, 3]);
    }
}
