//! 财务统计与欠费查询

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::expenses::{Column as ExpenseColumn, Entity as Expenses};
use crate::entity::fees_receipts::{Column as ReceiptColumn, Entity as FeesReceipts};
use crate::entity::parse_date;
use crate::entity::payrolls::{Column as PayrollColumn, Entity as Payrolls};
use crate::errors::{InstituteError, Result};
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::finance::{
    analytics::{
        CourseDue, CourseIncomeRow, CourseOutstanding, FinanceSummary, OverallOutstanding,
        StudentOutstanding, build_monthly_timeline, round2,
    },
    responses::FinanceAnalyticsResponse,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

/// 报名的 (学员, 课程, 状态)
type EnrollmentRow = (i64, i64, String);

impl SeaOrmStorage {
    /// 收入、支出、工资汇总及按月、按课程统计
    pub async fn get_finance_analytics_impl(&self) -> Result<FinanceAnalyticsResponse> {
        let receipts: Vec<(String, f64, Option<i64>)> = FeesReceipts::find()
            .select_only()
            .column(ReceiptColumn::Date)
            .column(ReceiptColumn::Amount)
            .column(ReceiptColumn::CourseId)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询收据失败: {e}")))?;

        let expenses: Vec<(String, f64)> = Expenses::find()
            .select_only()
            .column(ExpenseColumn::Date)
            .column(ExpenseColumn::Amount)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询支出失败: {e}")))?;

        let payrolls: Vec<(String, f64)> = Payrolls::find()
            .select_only()
            .column(PayrollColumn::Month)
            .column(PayrollColumn::Amount)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询工资记录失败: {e}")))?;

        let enrollments = self.load_enrollment_rows(None).await?;

        let total_income: f64 = receipts.iter().map(|r| r.1).sum();
        let total_expense: f64 = expenses.iter().map(|e| e.1).sum();
        let total_payroll: f64 = payrolls.iter().map(|p| p.1).sum();
        let active = EnrollmentStatus::Active.to_string();
        let total_active_students = enrollments
            .iter()
            .filter(|(_, _, status)| *status == active)
            .map(|(student, _, _)| *student)
            .collect::<HashSet<_>>()
            .len() as i64;

        let income_by_date: Vec<_> = receipts
            .iter()
            .map(|(date, amount, _)| (parse_date(date), *amount))
            .collect();
        let expense_by_date: Vec<_> = expenses
            .iter()
            .map(|(date, amount)| (parse_date(date), *amount))
            .collect();
        let timeline = build_monthly_timeline(&income_by_date, &expense_by_date, &payrolls);

        // 按课程统计收入与在读学员
        let mut income_by_course: HashMap<i64, f64> = HashMap::new();
        for (_, amount, course_id) in &receipts {
            if let Some(course_id) = course_id {
                *income_by_course.entry(*course_id).or_default() += amount;
            }
        }
        let mut active_by_course: HashMap<i64, HashSet<i64>> = HashMap::new();
        for (student, course, status) in &enrollments {
            if *status == active {
                active_by_course.entry(*course).or_default().insert(*student);
            }
        }

        let courses = Courses::find()
            .order_by_asc(CourseColumn::Title)
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询课程失败: {e}")))?;

        let courses = courses
            .into_iter()
            .map(|c| CourseIncomeRow {
                total_income: round2(income_by_course.get(&c.id).copied().unwrap_or(0.0)),
                active_students: active_by_course.get(&c.id).map_or(0, |s| s.len() as i64),
                course_id: c.id,
                course_code: c.code,
                course_title: c.title,
            })
            .collect();

        Ok(FinanceAnalyticsResponse {
            summary: FinanceSummary {
                total_income: round2(total_income),
                total_expense: round2(total_expense),
                total_payroll: round2(total_payroll),
                net_profit: round2(total_income - (total_expense + total_payroll)),
                total_active_students,
            },
            timeline,
            courses,
        })
    }

    /// 学员欠费：每门已报名课程的学费、已缴、欠缴
    pub async fn get_student_outstanding_impl(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentOutstanding>> {
        let briefs = self.load_student_briefs(vec![student_id]).await?;
        let Some(brief) = briefs.get(&student_id) else {
            return Ok(None);
        };

        let enrollments = self.list_student_enrollments(student_id).await?;
        let mut course_ids: Vec<i64> = Vec::new();
        for e in &enrollments {
            if !course_ids.contains(&e.course_id) {
                course_ids.push(e.course_id);
            }
        }
        let courses = self.load_courses_map(course_ids.clone()).await?;

        let receipts: Vec<(Option<i64>, f64)> = FeesReceipts::find()
            .select_only()
            .column(ReceiptColumn::CourseId)
            .column(ReceiptColumn::Amount)
            .filter(ReceiptColumn::StudentId.eq(student_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询收据失败: {e}")))?;

        let mut paid_by_course: HashMap<i64, f64> = HashMap::new();
        for (course_id, amount) in receipts {
            if let Some(course_id) = course_id {
                *paid_by_course.entry(course_id).or_default() += amount;
            }
        }

        let dues = course_ids
            .into_iter()
            .filter_map(|id| {
                let course = courses.get(&id)?;
                Some(CourseDue::new(
                    id,
                    course.code.clone(),
                    course.title.clone(),
                    course.total_fees,
                    paid_by_course.get(&id).copied().unwrap_or(0.0),
                ))
            })
            .collect();

        Ok(Some(StudentOutstanding::new(
            student_id,
            brief.name.clone(),
            brief.reg_no.clone(),
            dues,
        )))
    }

    /// 课程欠费：报名学员数 × 学费 与实收对比
    pub async fn get_course_outstanding_impl(
        &self,
        course_id: i64,
    ) -> Result<Option<CourseOutstanding>> {
        let Some(course) = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        let students = self
            .load_enrollment_rows(Some(course_id))
            .await?
            .into_iter()
            .map(|(student, _, _)| student)
            .collect::<HashSet<_>>()
            .len() as i64;

        let collected: f64 = FeesReceipts::find()
            .select_only()
            .column(ReceiptColumn::Amount)
            .filter(ReceiptColumn::CourseId.eq(course_id))
            .into_tuple::<f64>()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询收据失败: {e}")))?
            .into_iter()
            .sum();

        Ok(Some(CourseOutstanding::new(
            course.id,
            course.code,
            course.title,
            course.total_fees,
            students,
            collected,
        )))
    }

    /// 全部课程的欠费汇总
    pub async fn get_overall_outstanding_impl(&self) -> Result<OverallOutstanding> {
        let courses = Courses::find()
            .order_by_asc(CourseColumn::Title)
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询课程失败: {e}")))?;

        let mut students_by_course: HashMap<i64, HashSet<i64>> = HashMap::new();
        for (student, course, _) in self.load_enrollment_rows(None).await? {
            students_by_course.entry(course).or_default().insert(student);
        }

        let receipts: Vec<(Option<i64>, f64)> = FeesReceipts::find()
            .select_only()
            .column(ReceiptColumn::CourseId)
            .column(ReceiptColumn::Amount)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询收据失败: {e}")))?;
        let mut collected_by_course: HashMap<i64, f64> = HashMap::new();
        for (course_id, amount) in receipts {
            if let Some(course_id) = course_id {
                *collected_by_course.entry(course_id).or_default() += amount;
            }
        }

        let rows = courses
            .into_iter()
            .map(|c| {
                CourseOutstanding::new(
                    c.id,
                    c.code,
                    c.title,
                    c.total_fees,
                    students_by_course.get(&c.id).map_or(0, |s| s.len() as i64),
                    collected_by_course.get(&c.id).copied().unwrap_or(0.0),
                )
            })
            .collect();

        Ok(OverallOutstanding::new(rows))
    }

    async fn load_enrollment_rows(&self, course_id: Option<i64>) -> Result<Vec<EnrollmentRow>> {
        let mut select = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .column(EnrollmentColumn::CourseId)
            .column(EnrollmentColumn::Status);

        if let Some(course_id) = course_id {
            select = select.filter(EnrollmentColumn::CourseId.eq(course_id));
        }

        select
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询报名失败: {e}")))
    }
}
