//! 收费收据
//!
//! 编号在事务内加锁生成，创建后立即渲染 PDF。锁定后的收据不可再修改，
//! 公开下载凭 `public_id` 进行，无需登录。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::FinanceService;
use crate::middlewares::RequireJWT;
use crate::models::finance::entities::{RECEIPT_LOCKED, ReceiptDetail};
use crate::models::finance::requests::{
    CreateReceiptRequest, ReceiptListParams, ReceiptListQuery, UpdateReceiptRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::documents::{ensure_receipt_pdf, generate_receipt_pdf, pdf_response};
use crate::services::{
    Caller, bad_request, forbidden, not_found, resolve_caller, storage_error_response,
    unauthorized,
};
use crate::utils::pdf::attachment_name;
use crate::utils::validate::validate_amount;

fn receipt_not_found() -> HttpResponse {
    not_found(ErrorCode::ReceiptNotFound, "Receipt not found.")
}

fn document_unavailable(detail: &ReceiptDetail, e: impl std::fmt::Display) -> HttpResponse {
    error!(
        "Failed to provide receipt {}: {}",
        detail.receipt.receipt_no, e
    );
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::DocumentUnavailable,
        "Receipt document is unavailable.",
    ))
}

pub async fn list_receipts(
    service: &FinanceService,
    query: ReceiptListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let mut list_query = ReceiptListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id: query.student_id,
        course_id: query.course_id,
        mode: query.mode,
        date_from: query.date_from,
        date_to: query.date_to,
        search: query.search,
    };
    match caller {
        Caller::Staff(_) => {}
        Caller::Student(_, student) => list_query.student_id = Some(student.id),
        Caller::Other(_) => list_query.student_id = Some(-1),
    }

    match storage.list_receipts_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Receipt list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn create_receipt(
    service: &FinanceService,
    data: CreateReceiptRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(posted_by) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    if let Err(msg) = validate_amount(data.amount) {
        return Ok(bad_request(ErrorCode::ReceiptInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.get_student_by_id(data.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(bad_request(
                ErrorCode::ReceiptInvalid,
                "Selected student does not exist.",
            ));
        }
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
    if let Some(course_id) = data.course_id {
        match storage.get_course_by_id(course_id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Ok(bad_request(
                    ErrorCode::ReceiptInvalid,
                    "Selected course does not exist.",
                ));
            }
            Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
        }
    }

    let receipt = match storage.create_receipt(posted_by, data).await {
        Ok(receipt) => receipt,
        Err(e) => return Ok(storage_error_response(e, ErrorCode::ReceiptInvalid)),
    };
    info!(
        "Receipt {} posted for student {}",
        receipt.receipt_no, receipt.student_id
    );

    let detail = match storage.get_receipt_by_id(receipt.id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Ok(receipt_not_found()),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    if let Err(e) = generate_receipt_pdf(&storage, &detail).await {
        error!(
            "Failed to render receipt {}: {}",
            detail.receipt.receipt_no, e
        );
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        detail,
        "Receipt created successfully",
    )))
}

pub async fn get_receipt(
    service: &FinanceService,
    receipt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    match storage.get_receipt_by_id(receipt_id).await {
        Ok(Some(detail)) if caller.can_access_student(detail.receipt.student_id) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Receipt retrieved successfully",
            )))
        }
        Ok(_) => Ok(receipt_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::ReceiptNotFound)),
    }
}

pub async fn update_receipt(
    service: &FinanceService,
    receipt_id: i64,
    data: UpdateReceiptRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(amount) = data.amount
        && let Err(msg) = validate_amount(amount)
    {
        return Ok(bad_request(ErrorCode::ReceiptInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage.update_receipt(receipt_id, data).await {
        Ok(Some(receipt)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            receipt,
            "Receipt updated successfully",
        ))),
        Ok(None) => Ok(receipt_not_found()),
        Err(e) => {
            let code = if e.message() == RECEIPT_LOCKED {
                ErrorCode::ReceiptLocked
            } else {
                ErrorCode::ReceiptInvalid
            };
            Ok(storage_error_response(e, code))
        }
    }
}

pub async fn lock_receipt(
    service: &FinanceService,
    receipt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.lock_receipt(receipt_id).await {
        Ok(Some(receipt)) => {
            info!("Receipt {} locked", receipt.receipt_no);
            Ok(HttpResponse::Ok().json(ApiResponse::success(receipt, "Receipt locked")))
        }
        Ok(None) => Ok(receipt_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::ReceiptNotFound)),
    }
}

pub async fn delete_receipt(
    service: &FinanceService,
    receipt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_receipt(receipt_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Receipt deleted successfully")))
        }
        Ok(false) => Ok(receipt_not_found()),
        Err(e) => Ok(storage_error_response(e, ErrorCode::ReceiptNotFound)),
    }
}

pub async fn download_receipt(
    service: &FinanceService,
    receipt_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let detail = match storage.get_receipt_by_id(receipt_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Ok(receipt_not_found()),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };
    if !caller.can_access_student(detail.receipt.student_id) {
        return Ok(forbidden());
    }

    match ensure_receipt_pdf(&storage, &detail).await {
        Ok(bytes) => Ok(pdf_response(
            bytes,
            attachment_name("receipt", &detail.receipt.receipt_no),
        )),
        Err(e) => Ok(document_unavailable(&detail, e)),
    }
}

/// 凭公开链接下载，无需登录
pub async fn public_receipt(
    service: &FinanceService,
    public_id: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let detail = match storage.get_receipt_by_public_id(public_id).await {
        Ok(Some(detail)) => detail,
        Ok(None) => return Ok(receipt_not_found()),
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    match ensure_receipt_pdf(&storage, &detail).await {
        Ok(bytes) => Ok(pdf_response(
            bytes,
            attachment_name("receipt", &detail.receipt.receipt_no),
        )),
        Err(e) => Ok(document_unavailable(&detail, e)),
    }
}
