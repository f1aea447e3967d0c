//! 活动公告
//!
//! 列表与详情无需登录：职员看到全部活动，其他人只看到尚未结束的活动。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EventService;
use crate::middlewares::RequireJWT;
use crate::models::events::requests::{
    CreateEventRequest, EventListParams, EventListQuery, UpdateEventRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, storage_error_response, unauthorized};
use crate::storage::today;
use crate::utils::validate::validate_required;

fn event_not_found() -> HttpResponse {
    not_found(ErrorCode::EventNotFound, "Event not found.")
}

pub async fn list_events(
    service: &EventService,
    query: EventListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let upcoming_from = if RequireJWT::is_staff(request) {
        None
    } else {
        Some(today())
    };
    let list_query = EventListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        upcoming_from,
    };

    match storage.list_events_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Event list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn get_event(
    service: &EventService,
    event_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let is_staff = RequireJWT::is_staff(request);

    match storage.get_event_by_id(event_id).await {
        Ok(Some(event)) if is_staff || event.is_visible_on(today()) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(event, "Event retrieved successfully"))),
        Ok(_) => Ok(event_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::EventNotFound)),
    }
}

pub async fn create_event(
    service: &EventService,
    data: CreateEventRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(created_by) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    if let Err(msg) = validate_required(&data.title, "Title is required.") {
        return Ok(bad_request(ErrorCode::EventInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.create_event(created_by, data).await {
        Ok(event) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(event, "Event created successfully"))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::EventInvalid)),
    }
}

pub async fn update_event(
    service: &EventService,
    event_id: i64,
    data: UpdateEventRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref title) = data.title
        && let Err(msg) = validate_required(title, "Title is required.")
    {
        return Ok(bad_request(ErrorCode::EventInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_event(event_id, data).await {
        Ok(Some(event)) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(event, "Event updated successfully"))),
        Ok(None) => Ok(event_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::EventInvalid)),
    }
}

pub async fn delete_event(
    service: &EventService,
    event_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_event(event_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Event deleted successfully")))
        }
        Ok(false) => Ok(event_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::EventNotFound)),
    }
}
