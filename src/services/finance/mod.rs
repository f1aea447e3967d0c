pub mod analytics;
pub mod expenses;
pub mod payrolls;
pub mod receipts;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::finance::requests::{
    CreateExpenseRequest, CreatePayrollRequest, CreateReceiptRequest, ExpenseListParams,
    PayrollListParams, ReceiptListParams, UpdateExpenseRequest, UpdatePayrollRequest,
    UpdateReceiptRequest,
};

crate::services::lazy_service!(FinanceService);

impl FinanceService {
    // 收据
    pub async fn list_receipts(
        &self,
        query: ReceiptListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipts::list_receipts(self, query, request).await
    }

    pub async fn create_receipt(
        &self,
        data: CreateReceiptRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipts::create_receipt(self, data, request).await
    }

    pub async fn get_receipt(
        &self,
        receipt_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipts::get_receipt(self, receipt_id, request).await
    }

    pub async fn update_receipt(
        &self,
        receipt_id: i64,
        data: UpdateReceiptRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipts::update_receipt(self, receipt_id, data, request).await
    }

    pub async fn lock_receipt(
        &self,
        receipt_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipts::lock_receipt(self, receipt_id, request).await
    }

    pub async fn delete_receipt(
        &self,
        receipt_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipts::delete_receipt(self, receipt_id, request).await
    }

    pub async fn download_receipt(
        &self,
        receipt_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipts::download_receipt(self, receipt_id, request).await
    }

    pub async fn public_receipt(
        &self,
        public_id: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        receipts::public_receipt(self, public_id, request).await
    }

    // 支出
    pub async fn list_expenses(
        &self,
        query: ExpenseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        expenses::list_expenses(self, query, request).await
    }

    pub async fn create_expense(
        &self,
        data: CreateExpenseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        expenses::create_expense(self, data, request).await
    }

    pub async fn get_expense(
        &self,
        expense_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        expenses::get_expense(self, expense_id, request).await
    }

    pub async fn update_expense(
        &self,
        expense_id: i64,
        data: UpdateExpenseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        expenses::update_expense(self, expense_id, data, request).await
    }

    pub async fn delete_expense(
        &self,
        expense_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        expenses::delete_expense(self, expense_id, request).await
    }

    // 工资
    pub async fn list_payrolls(
        &self,
        query: PayrollListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payrolls::list_payrolls(self, query, request).await
    }

    pub async fn create_payroll(
        &self,
        data: CreatePayrollRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payrolls::create_payroll(self, data, request).await
    }

    pub async fn get_payroll(
        &self,
        payroll_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payrolls::get_payroll(self, payroll_id, request).await
    }

    pub async fn update_payroll(
        &self,
        payroll_id: i64,
        data: UpdatePayrollRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payrolls::update_payroll(self, payroll_id, data, request).await
    }

    pub async fn delete_payroll(
        &self,
        payroll_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        payrolls::delete_payroll(self, payroll_id, request).await
    }

    // 统计
    pub async fn finance_analytics(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        analytics::finance_analytics(self, request).await
    }

    pub async fn student_outstanding(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        analytics::student_outstanding(self, student_id, request).await
    }

    pub async fn course_outstanding(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        analytics::course_outstanding(self, course_id, request).await
    }

    pub async fn overall_outstanding(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        analytics::overall_outstanding(self, request).await
    }
}
