//! 讲师档案，仅职员可用

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TrainerService;
use crate::models::courses::requests::{
    CreateTrainerRequest, TrainerListParams, TrainerListQuery, UpdateTrainerRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, storage_error_response};
use crate::utils::validate::{validate_amount, validate_required};

pub async fn list_trainers(
    service: &TrainerService,
    query: TrainerListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = TrainerListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        is_active: query.is_active,
    };

    match storage.list_trainers_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Trainer list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_trainer(
    service: &TrainerService,
    data: CreateTrainerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required(&data.emp_no, "Employee number is required.")
        .and_then(|_| validate_amount(data.salary))
    {
        return Ok(bad_request(ErrorCode::TrainerInvalid, msg));
    }

    let storage = service.get_storage(request);

    match storage.get_user_by_id(data.user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(bad_request(
                ErrorCode::TrainerInvalid,
                "Selected user does not exist.",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }

    match storage.create_trainer(data).await {
        Ok(detail) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(detail, "Trainer created successfully"))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::TrainerInvalid)),
    }
}

pub async fn get_trainer(
    service: &TrainerService,
    trainer_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_trainer_by_id(trainer_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Trainer retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::TrainerNotFound, "Trainer not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::TrainerNotFound)),
    }
}

pub async fn update_trainer(
    service: &TrainerService,
    trainer_id: i64,
    data: UpdateTrainerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref emp_no) = data.emp_no
        && let Err(msg) = validate_required(emp_no, "Employee number is required.")
    {
        return Ok(bad_request(ErrorCode::TrainerInvalid, msg));
    }
    if let Some(salary) = data.salary
        && let Err(msg) = validate_amount(salary)
    {
        return Ok(bad_request(ErrorCode::TrainerInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_trainer(trainer_id, data).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Trainer updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::TrainerNotFound, "Trainer not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::TrainerInvalid)),
    }
}

pub async fn delete_trainer(
    service: &TrainerService,
    trainer_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_trainer(trainer_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Trainer deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::TrainerNotFound, "Trainer not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::TrainerNotFound)),
    }
}
