use serde::Serialize;
use ts_rs::TS;

use super::analytics::{CourseIncomeRow, FinanceSummary, MonthlyFinanceRow};
use super::entities::{Expense, PayrollDetail, ReceiptDetail};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct ReceiptListResponse {
    pub items: Vec<ReceiptDetail>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct ExpenseListResponse {
    pub items: Vec<Expense>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct PayrollListResponse {
    pub items: Vec<PayrollDetail>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct FinanceAnalyticsResponse {
    pub summary: FinanceSummary,
    pub timeline: Vec<MonthlyFinanceRow>,
    pub courses: Vec<CourseIncomeRow>,
}
