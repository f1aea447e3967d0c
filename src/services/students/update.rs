use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::students::requests::UpdateStudentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, storage_error_response};
use crate::storage::today;
use crate::utils::validate::{validate_not_future, validate_phone, validate_required};

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    data: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref name) = data.guardian_name
        && let Err(msg) = validate_required(name, "Guardian name is required.")
    {
        return Ok(bad_request(ErrorCode::StudentInvalid, msg));
    }
    if let Some(ref phone) = data.guardian_phone
        && let Err(msg) = validate_phone(phone)
    {
        return Ok(bad_request(ErrorCode::StudentInvalid, msg));
    }
    if let Some(date) = data.admission_date
        && let Err(msg) = validate_not_future(date, today())
    {
        return Ok(bad_request(ErrorCode::StudentInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_student(student_id, data).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Student updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::StudentInvalid)),
    }
}
