//! 财务统计：收支时间线与欠费计算

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use ts_rs::TS;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct FinanceSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub total_payroll: f64,
    pub net_profit: f64,
    pub total_active_students: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct MonthlyFinanceRow {
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub payroll: f64,
    pub net_profit: f64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct CourseIncomeRow {
    pub course_id: i64,
    pub course_code: String,
    pub course_title: String,
    pub total_income: f64,
    pub active_students: i64,
}

/// 按 `YYYY-MM` 汇总收入、支出、工资；净利润 = 收入 − (支出 + 工资)
pub fn build_monthly_timeline(
    income: &[(NaiveDate, f64)],
    expense: &[(NaiveDate, f64)],
    payroll: &[(String, f64)],
) -> Vec<MonthlyFinanceRow> {
    let mut months: BTreeMap<String, (f64, f64, f64)> = BTreeMap::new();
    for (date, amount) in income {
        months.entry(date.format("%Y-%m").to_string()).or_default().0 += amount;
    }
    for (date, amount) in expense {
        months.entry(date.format("%Y-%m").to_string()).or_default().1 += amount;
    }
    for (month, amount) in payroll {
        months.entry(month.clone()).or_default().2 += amount;
    }

    months
        .into_iter()
        .map(|(month, (income, expense, payroll))| MonthlyFinanceRow {
            month,
            income: round2(income),
            expense: round2(expense),
            payroll: round2(payroll),
            net_profit: round2(income - (expense + payroll)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct CourseDue {
    pub course_id: i64,
    pub course_code: String,
    pub course_title: String,
    pub total_fees: f64,
    pub paid: f64,
    pub due: f64,
}

impl CourseDue {
    pub fn new(course_id: i64, code: String, title: String, total_fees: f64, paid: f64) -> Self {
        Self {
            course_id,
            course_code: code,
            course_title: title,
            total_fees: round2(total_fees),
            paid: round2(paid),
            due: outstanding(total_fees, paid),
        }
    }
}

/// 欠费不为负
pub fn outstanding(total_fees: f64, paid: f64) -> f64 {
    round2((total_fees - paid).max(0.0))
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct StudentOutstanding {
    pub student_id: i64,
    pub student_name: String,
    pub reg_no: Option<String>,
    pub courses: Vec<CourseDue>,
    pub total_fees: f64,
    pub total_paid: f64,
    pub total_due: f64,
}

impl StudentOutstanding {
    pub fn new(
        student_id: i64,
        student_name: String,
        reg_no: Option<String>,
        courses: Vec<CourseDue>,
    ) -> Self {
        let total_fees = round2(courses.iter().map(|c| c.total_fees).sum());
        let total_paid = round2(courses.iter().map(|c| c.paid).sum());
        let total_due = round2(courses.iter().map(|c| c.due).sum());
        Self {
            student_id,
            student_name,
            reg_no,
            courses,
            total_fees,
            total_paid,
            total_due,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct CourseOutstanding {
    pub course_id: i64,
    pub course_code: String,
    pub course_title: String,
    pub fee_per_student: f64,
    pub students: i64,
    pub expected: f64,
    pub collected: f64,
    pub due: f64,
}

impl CourseOutstanding {
    pub fn new(
        course_id: i64,
        code: String,
        title: String,
        fee_per_student: f64,
        students: i64,
        collected: f64,
    ) -> Self {
        let expected = fee_per_student * students as f64;
        Self {
            course_id,
            course_code: code,
            course_title: title,
            fee_per_student: round2(fee_per_student),
            students,
            expected: round2(expected),
            collected: round2(collected),
            due: outstanding(expected, collected),
        }
    }
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "finance.ts")]
pub struct OverallOutstanding {
    pub courses: Vec<CourseOutstanding>,
    pub grand_expected: f64,
    pub grand_collected: f64,
    pub grand_due: f64,
}

impl OverallOutstanding {
    pub fn new(courses: Vec<CourseOutstanding>) -> Self {
        let grand_expected = round2(courses.iter().map(|c| c.expected).sum());
        let grand_collected = round2(courses.iter().map(|c| c.collected).sum());
        let grand_due = round2(courses.iter().map(|c| c.due).sum());
        Self {
            courses,
            grand_expected,
            grand_collected,
            grand_due,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_timeline_groups_and_sorts_by_month() {
        let income = [(d("2025-02-10"), 1000.0), (d("2025-01-05"), 500.0), (d("2025-02-20"), 250.5)];
        let expense = [(d("2025-02-01"), 300.0)];
        let payroll = [("2025-03".to_string(), 800.0), ("2025-02".to_string(), 400.0)];

        let rows = build_monthly_timeline(&income, &expense, &payroll);
        let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
        assert_eq!(months, ["2025-01", "2025-02", "2025-03"]);

        assert_eq!(rows[1].income, 1250.5);
        assert_eq!(rows[1].expense, 300.0);
        assert_eq!(rows[1].payroll, 400.0);
        assert_eq!(rows[1].net_profit, 550.5);
        assert_eq!(rows[2].net_profit, -800.0);
    }

    #[test]
    fn test_outstanding_never_negative() {
        assert_eq!(outstanding(15000.0, 5000.0), 10000.0);
        assert_eq!(outstanding(15000.0, 16000.0), 0.0);
    }

    #[test]
    fn test_student_totals() {
        let courses = vec![
            CourseDue::new(1, "WEB".into(), "Web".into(), 10000.0, 4000.0),
            CourseDue::new(2, "TAL".into(), "Tally".into(), 5000.0, 6000.0),
        ];
        let s = StudentOutstanding::new(9, "Ravi".into(), None, courses);
        assert_eq!(s.total_fees, 15000.0);
        assert_eq!(s.total_paid, 10000.0);
        assert_eq!(s.total_due, 6000.0);
    }

    #[test]
    fn test_overall_grand_totals() {
        let rows = vec![
            CourseOutstanding::new(1, "WEB".into(), "Web".into(), 1000.0, 3, 2500.0),
            CourseOutstanding::new(2, "TAL".into(), "Tally".into(), 500.0, 2, 1000.0),
        ];
        assert_eq!(rows[0].expected, 3000.0);
        assert_eq!(rows[0].due, 500.0);
        let overall = OverallOutstanding::new(rows);
        assert_eq!(overall.grand_expected, 4000.0);
        assert_eq!(overall.grand_collected, 3500.0);
        assert_eq!(overall.grand_due, 500.0);
    }
}
