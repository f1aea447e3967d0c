use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

use super::entities::{ExpenseCategory, PaymentMode};
use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_i64;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct CreateReceiptRequest {
    pub student_id: i64,
    pub course_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub amount: f64,
    pub mode: PaymentMode,
    #[serde(default)]
    pub txn_id: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct UpdateReceiptRequest {
    pub course_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub amount: Option<f64>,
    pub mode: Option<PaymentMode>,
    pub txn_id: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct ReceiptListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    pub mode: Option<PaymentMode>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReceiptListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub course_id: Option<i64>,
    pub mode: Option<PaymentMode>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct CreateExpenseRequest {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub category: ExpenseCategory,
    pub amount: f64,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct UpdateExpenseRequest {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub amount: Option<f64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct ExpenseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub category: Option<ExpenseCategory>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct CreatePayrollRequest {
    pub trainer_id: i64,
    pub month: String,
    pub amount: f64,
    pub paid_on: Option<NaiveDate>,
    #[serde(default)]
    pub remarks: String,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct UpdatePayrollRequest {
    pub month: Option<String>,
    pub amount: Option<f64>,
    pub paid_on: Option<NaiveDate>,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct PayrollListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub trainer_id: Option<i64>,
    pub month: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub category: Option<ExpenseCategory>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default)]
pub struct PayrollListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub trainer_id: Option<i64>,
    pub month: Option<String>,
}
