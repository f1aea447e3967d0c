use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinanceService;
use crate::middlewares::RequireJWT;
use crate::models::finance::requests::{
    CreateExpenseRequest, ExpenseListParams, ExpenseListQuery, UpdateExpenseRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, not_found, storage_error_response, unauthorized};
use crate::utils::validate::{validate_amount, validate_required};

pub async fn list_expenses(
    service: &FinanceService,
    query: ExpenseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = ExpenseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        category: query.category,
        date_from: query.date_from,
        date_to: query.date_to,
    };

    match storage.list_expenses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Expense list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_expense(
    service: &FinanceService,
    data: CreateExpenseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(added_by) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    if let Err(msg) = validate_required(&data.description, "Description is required.")
        .and_then(|_| validate_amount(data.amount))
    {
        return Ok(bad_request(ErrorCode::ExpenseInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.create_expense(added_by, data).await {
        Ok(expense) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(expense, "Expense created successfully"))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::ExpenseInvalid)),
    }
}

pub async fn get_expense(
    service: &FinanceService,
    expense_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_expense_by_id(expense_id).await {
        Ok(Some(expense)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            expense,
            "Expense retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ExpenseNotFound, "Expense not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::ExpenseNotFound)),
    }
}

pub async fn update_expense(
    service: &FinanceService,
    expense_id: i64,
    data: UpdateExpenseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(ref description) = data.description
        && let Err(msg) = validate_required(description, "Description is required.")
    {
        return Ok(bad_request(ErrorCode::ExpenseInvalid, msg));
    }
    if let Some(amount) = data.amount
        && let Err(msg) = validate_amount(amount)
    {
        return Ok(bad_request(ErrorCode::ExpenseInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_expense(expense_id, data).await {
        Ok(Some(expense)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            expense,
            "Expense updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ExpenseNotFound, "Expense not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::ExpenseInvalid)),
    }
}

pub async fn delete_expense(
    service: &FinanceService,
    expense_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_expense(expense_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Expense deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ExpenseNotFound, "Expense not found.")),
        Err(e) => Ok(storage_error_response(e, ErrorCode::ExpenseNotFound)),
    }
}
