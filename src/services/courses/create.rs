use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, storage_error_response};
use crate::utils::validate::{validate_amount, validate_required};

/// 课程字段约束：时长至少一周，学费非负，出勤要求至少一天
pub(crate) fn check_course_numbers(
    duration_weeks: Option<i32>,
    total_fees: Option<f64>,
    required_days: Option<i32>,
) -> Result<(), &'static str> {
    if duration_weeks.is_some_and(|w| w < 1) {
        return Err("Duration must be at least 1 week.");
    }
    if let Some(fees) = total_fees {
        validate_amount(fees)?;
    }
    if required_days.is_some_and(|d| d < 1) {
        return Err("Required attendance days must be at least 1.");
    }
    Ok(())
}

pub async fn create_course(
    service: &CourseService,
    data: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required(&data.code, "Course code is required.")
        .and_then(|_| validate_required(&data.title, "Course title is required."))
        .and_then(|_| {
            check_course_numbers(
                Some(data.duration_weeks),
                Some(data.total_fees),
                Some(data.required_attendance_days),
            )
        })
    {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.create_course(data).await {
        Ok(course) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(course, "Course created successfully"))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::CourseInvalid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_course_numbers() {
        assert!(check_course_numbers(Some(12), Some(15000.0), Some(36)).is_ok());
        assert!(check_course_numbers(None, None, None).is_ok());
        assert!(check_course_numbers(Some(0), None, None).is_err());
        assert!(check_course_numbers(None, Some(-1.0), None).is_err());
        assert!(check_course_numbers(None, None, Some(0)).is_err());
    }
}
