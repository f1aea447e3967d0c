//! 财务路由：收据、支出、工资与统计
//!
//! 收据列表、详情与下载对学员开放（服务内按本人过滤），公开下载无需登录，
//! 其余操作仅职员。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::finance::requests::{
    CreateExpenseRequest, CreatePayrollRequest, CreateReceiptRequest, ExpenseListParams,
    PayrollListParams, ReceiptListParams, UpdateExpenseRequest, UpdatePayrollRequest,
    UpdateReceiptRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::FinanceService;
use crate::utils::{SafeCourseIdI64, SafeIDI64, SafePublicId, SafeStudentIdI64};

// 懒加载的全局 FinanceService 实例
static FINANCE_SERVICE: Lazy<FinanceService> = Lazy::new(FinanceService::new_lazy);

// 收据
pub async fn list_receipts(
    req: HttpRequest,
    query: web::Query<ReceiptListParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_receipts(query.into_inner(), &req).await
}

pub async fn create_receipt(
    req: HttpRequest,
    data: web::Json<CreateReceiptRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_receipt(data.into_inner(), &req).await
}

pub async fn get_receipt(req: HttpRequest, receipt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.get_receipt(receipt_id.0, &req).await
}

pub async fn update_receipt(
    req: HttpRequest,
    receipt_id: SafeIDI64,
    data: web::Json<UpdateReceiptRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .update_receipt(receipt_id.0, data.into_inner(), &req)
        .await
}

pub async fn lock_receipt(req: HttpRequest, receipt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.lock_receipt(receipt_id.0, &req).await
}

pub async fn delete_receipt(req: HttpRequest, receipt_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.delete_receipt(receipt_id.0, &req).await
}

pub async fn download_receipt(
    req: HttpRequest,
    receipt_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.download_receipt(receipt_id.0, &req).await
}

pub async fn public_receipt(
    req: HttpRequest,
    public_id: SafePublicId,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.public_receipt(&public_id.0, &req).await
}

// 支出
pub async fn list_expenses(
    req: HttpRequest,
    query: web::Query<ExpenseListParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_expenses(query.into_inner(), &req).await
}

pub async fn create_expense(
    req: HttpRequest,
    data: web::Json<CreateExpenseRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_expense(data.into_inner(), &req).await
}

pub async fn get_expense(req: HttpRequest, expense_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.get_expense(expense_id.0, &req).await
}

pub async fn update_expense(
    req: HttpRequest,
    expense_id: SafeIDI64,
    data: web::Json<UpdateExpenseRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .update_expense(expense_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_expense(req: HttpRequest, expense_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.delete_expense(expense_id.0, &req).await
}

// 工资
pub async fn list_payrolls(
    req: HttpRequest,
    query: web::Query<PayrollListParams>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.list_payrolls(query.into_inner(), &req).await
}

pub async fn create_payroll(
    req: HttpRequest,
    data: web::Json<CreatePayrollRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.create_payroll(data.into_inner(), &req).await
}

pub async fn get_payroll(req: HttpRequest, payroll_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.get_payroll(payroll_id.0, &req).await
}

pub async fn update_payroll(
    req: HttpRequest,
    payroll_id: SafeIDI64,
    data: web::Json<UpdatePayrollRequest>,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE
        .update_payroll(payroll_id.0, data.into_inner(), &req)
        .await
}

pub async fn delete_payroll(req: HttpRequest, payroll_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.delete_payroll(payroll_id.0, &req).await
}

// 统计
pub async fn finance_analytics(req: HttpRequest) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.finance_analytics(&req).await
}

pub async fn student_outstanding(
    req: HttpRequest,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.student_outstanding(student_id.0, &req).await
}

pub async fn course_outstanding(
    req: HttpRequest,
    course_id: SafeCourseIdI64,
) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.course_outstanding(course_id.0, &req).await
}

pub async fn overall_outstanding(req: HttpRequest) -> ActixResult<HttpResponse> {
    FINANCE_SERVICE.overall_outstanding(&req).await
}

pub fn configure_finance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/finance")
            .route("/receipts/public/{public_id}", web::get().to(public_receipt))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/receipts", web::get().to(list_receipts))
                    .route("/receipts/{id}", web::get().to(get_receipt))
                    .route("/receipts/{id}/download", web::get().to(download_receipt))
                    .route(
                        "/outstanding/student/{student_id}",
                        web::get().to(student_outstanding),
                    )
                    .service(
                        web::scope("")
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                            .route("/receipts", web::post().to(create_receipt))
                            .route("/receipts/{id}", web::put().to(update_receipt))
                            .route("/receipts/{id}", web::patch().to(update_receipt))
                            .route("/receipts/{id}", web::delete().to(delete_receipt))
                            .route("/receipts/{id}/lock", web::post().to(lock_receipt))
                            .route("/expenses", web::get().to(list_expenses))
                            .route("/expenses", web::post().to(create_expense))
                            .route("/expenses/{id}", web::get().to(get_expense))
                            .route("/expenses/{id}", web::put().to(update_expense))
                            .route("/expenses/{id}", web::patch().to(update_expense))
                            .route("/expenses/{id}", web::delete().to(delete_expense))
                            .route("/payrolls", web::get().to(list_payrolls))
                            .route("/payrolls", web::post().to(create_payroll))
                            .route("/payrolls/{id}", web::get().to(get_payroll))
                            .route("/payrolls/{id}", web::put().to(update_payroll))
                            .route("/payrolls/{id}", web::patch().to(update_payroll))
                            .route("/payrolls/{id}", web::delete().to(delete_payroll))
                            .route("/analytics", web::get().to(finance_analytics))
                            .route(
                                "/outstanding/course/{course_id}",
                                web::get().to(course_outstanding),
                            )
                            .route("/outstanding", web::get().to(overall_outstanding)),
                    ),
            ),
    );
}
