use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 付款方式
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "finance.ts")]
pub enum PaymentMode {
    Cash,
    Upi,
    Bank,
    Card,
}

impl PaymentMode {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Upi => "UPI",
            PaymentMode::Bank => "Bank Transfer",
            PaymentMode::Card => "Card",
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMode::Cash => write!(f, "cash"),
            PaymentMode::Upi => write!(f, "upi"),
            PaymentMode::Bank => write!(f, "bank"),
            PaymentMode::Card => write!(f, "card"),
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMode::Cash),
            "upi" => Ok(PaymentMode::Upi),
            "bank" => Ok(PaymentMode::Bank),
            "card" => Ok(PaymentMode::Card),
            _ => Err(format!("Invalid payment mode: {s}")),
        }
    }
}

// 支出类别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "finance.ts")]
pub enum ExpenseCategory {
    Material,
    Maintenance,
    Salary,
    Other,
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseCategory::Material => write!(f, "material"),
            ExpenseCategory::Maintenance => write!(f, "maintenance"),
            ExpenseCategory::Salary => write!(f, "salary"),
            ExpenseCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ExpenseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "material" => Ok(ExpenseCategory::Material),
            "maintenance" => Ok(ExpenseCategory::Maintenance),
            "salary" => Ok(ExpenseCategory::Salary),
            "other" => Ok(ExpenseCategory::Other),
            _ => Err(format!("Invalid expense category: {s}")),
        }
    }
}

// 收费收据
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct FeesReceipt {
    pub id: i64,
    pub receipt_no: String,
    pub public_id: String,
    pub student_id: i64,
    pub course_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub amount: f64,
    pub mode: PaymentMode,
    pub txn_id: String,
    pub date: NaiveDate,
    pub posted_by: Option<i64>,
    pub locked: bool,
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub pdf_path: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 已锁定收据被修改时的提示
pub const RECEIPT_LOCKED: &str = "This receipt is locked and cannot be edited.";

impl FeesReceipt {
    pub fn is_editable(&self) -> bool {
        !self.locked
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct ReceiptDetail {
    pub receipt: FeesReceipt,
    pub student_name: String,
    pub reg_no: Option<String>,
    pub course_title: Option<String>,
    pub batch_code: Option<String>,
    pub posted_by_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub added_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 讲师工资发放，每个讲师每月一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct Payroll {
    pub id: i64,
    pub trainer_id: i64,
    pub month: String,
    pub amount: f64,
    pub paid_on: Option<NaiveDate>,
    pub remarks: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct PayrollDetail {
    pub payroll: Payroll,
    pub trainer_name: String,
    pub emp_no: String,
}

/// 校验 `YYYY-MM` 格式的月份
pub fn is_valid_month(month: &str) -> bool {
    NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d").is_ok() && month.len() == 7
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_month() {
        assert!(is_valid_month("2025-01"));
        assert!(is_valid_month("2024-12"));
        assert!(!is_valid_month("2025-13"));
        assert!(!is_valid_month("2025-1"));
        assert!(!is_valid_month("Jan 2025"));
    }

    #[test]
    fn test_payment_mode_strings() {
        assert_eq!("upi".parse(), Ok(PaymentMode::Upi));
        assert_eq!(PaymentMode::Bank.to_string(), "bank");
        assert_eq!(PaymentMode::Bank.label(), "Bank Transfer");
        assert!("cheque".parse::<PaymentMode>().is_err());
    }
}
