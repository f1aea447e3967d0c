use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use crate::models::finance::entities::is_valid_month;
use crate::models::finance::requests::{
    CreatePayrollRequest, PayrollListParams, PayrollListQuery, UpdatePayrollRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, storage_error_response};
use crate::utils::validate::validate_amount;

const INVALID_MONTH: &str = "Month must be in YYYY-MM format.";

pub async fn list_payrolls(
    service: &FinanceService,
    query: PayrollListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = PayrollListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        trainer_id: query.trainer_id,
        month: query.month,
    };

    match storage.list_payrolls_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Payroll list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_payroll(
    service: &FinanceService,
    data: CreatePayrollRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if !is_valid_month(&data.month) {
        return Ok(bad_request(ErrorCode::PayrollInvalid, INVALID_MONTH));
    }
    if let Err(msg) = validate_amount(data.amount) {
        return Ok(bad_request(ErrorCode::PayrollInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.get_trainer_by_id(data.trainer_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(bad_request(
                ErrorCode::PayrollInvalid,
                "Selected trainer does not exist.",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }

    match storage.create_payroll(data).await {
        Ok(detail) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(detail, "Payroll created successfully"))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::PayrollInvalid)),
    }
}

pub async fn get_payroll(
    service: &FinanceService,
    payroll_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_payroll_by_id(payroll_id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Payroll retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::PayrollNotFound, "Payroll not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::PayrollNotFound)),
    }
}

pub async fn update_payroll(
    service: &FinanceService,
    payroll_id: i64,
    data: UpdatePayrollRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if data.month.as_deref().is_some_and(|m| !is_valid_month(m)) {
        return Ok(bad_request(ErrorCode::PayrollInvalid, INVALID_MONTH));
    }
    if let Some(amount) = data.amount
        && let Err(msg) = validate_amount(amount)
    {
        return Ok(bad_request(ErrorCode::PayrollInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_payroll(payroll_id, data).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Payroll updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::PayrollNotFound, "Payroll not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::PayrollInvalid)),
    }
}

pub async fn delete_payroll(
    service: &FinanceService,
    payroll_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_payroll(payroll_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Payroll deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::PayrollNotFound, "Payroll not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::PayrollNotFound)),
    }
}
