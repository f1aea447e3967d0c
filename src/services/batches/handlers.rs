use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::BatchService;
use crate::models::courses::requests::{
    BatchListParams, BatchListQuery, CreateBatchRequest, UpdateBatchRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, storage_error_response};
use crate::storage::Storage;
use crate::utils::validate::validate_required;

async fn ensure_trainer(storage: &Arc<dyn Storage>, trainer_id: i64) -> Result<(), HttpResponse> {
    match storage.get_trainer_by_id(trainer_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(bad_request(
            ErrorCode::BatchInvalid,
            "Selected trainer does not exist.",
        )),
        Err(e) => Err(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_batches(
    service: &BatchService,
    query: BatchListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = BatchListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        course_id: query.course_id,
        search: query.search,
    };

    match storage.list_batches_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Batch list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_batch(
    service: &BatchService,
    data: CreateBatchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_required(&data.code, "Batch code is required.") {
        return Ok(bad_request(ErrorCode::BatchInvalid, msg));
    }
    if data.capacity < 1 {
        return Ok(bad_request(
            ErrorCode::BatchInvalid,
            "Capacity must be at least 1.",
        ));
    }

    let storage = service.get_storage(request);

    match storage.get_course_by_id(data.course_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(bad_request(
                ErrorCode::BatchInvalid,
                "Selected course does not exist.",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
    if let Some(trainer_id) = data.trainer_id
        && let Err(resp) = ensure_trainer(&storage, trainer_id).await
    {
        return Ok(resp);
    }

    match storage.create_batch(data).await {
        Ok(detail) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(detail, "Batch created successfully"))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::BatchInvalid)),
    }
}

pub async fn get_batch(
    service: &BatchService,
    batch_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_batch_by_id(batch_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Batch retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::BatchNotFound, "Batch not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::BatchNotFound)),
    }
}

pub async fn update_batch(
    service: &BatchService,
    batch_id: i64,
    data: UpdateBatchRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref code) = data.code
        && let Err(msg) = validate_required(code, "Batch code is required.")
    {
        return Ok(bad_request(ErrorCode::BatchInvalid, msg));
    }
    if data.capacity.is_some_and(|c| c < 1) {
        return Ok(bad_request(
            ErrorCode::BatchInvalid,
            "Capacity must be at least 1.",
        ));
    }

    let storage = service.get_storage(request);
    if let Some(trainer_id) = data.trainer_id
        && let Err(resp) = ensure_trainer(&storage, trainer_id).await
    {
        return Ok(resp);
    }

    match storage.update_batch(batch_id, data).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Batch updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::BatchNotFound, "Batch not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::BatchInvalid)),
    }
}

pub async fn delete_batch(
    service: &BatchService,
    batch_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_batch(batch_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Batch deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::BatchNotFound, "Batch not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::BatchNotFound)),
    }
}
