use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use super::create::check_course_numbers;
use crate::models::courses::requests::UpdateCourseRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, storage_error_response};
use crate::utils::validate::validate_required;

pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    data: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref code) = data.code
        && let Err(msg) = validate_required(code, "Course code is required.")
    {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }
    if let Some(ref title) = data.title
        && let Err(msg) = validate_required(title, "Course title is required.")
    {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }
    if let Err(msg) = check_course_numbers(
        data.duration_weeks,
        data.total_fees,
        data.required_attendance_days,
    ) {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_course(course_id, data).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::CourseInvalid)),
    }
}
