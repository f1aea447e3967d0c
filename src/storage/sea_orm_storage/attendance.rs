//! 考勤存储操作

use std::collections::{HashMap, HashSet};

use super::{SeaOrmStorage, map_write_err};
use crate::entity::attendance_entries::{
    ActiveModel as EntryActiveModel, Column as EntryColumn, Entity as AttendanceEntries,
};
use crate::entity::attendance_records::{
    ActiveModel, Column, Entity as AttendanceRecords, Model as RecordModel,
};
use crate::entity::format_date;
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    attendance::{
        entities::{
            AttendanceEntryDetail, AttendanceRecordDetail, AttendanceStatus, AttendanceSummary,
            EnrollmentProgress, MyAttendanceItem, StudentAttendanceAnalytics,
        },
        requests::{
            AttendanceEntryInput, AttendanceListQuery, CreateAttendanceRequest,
            UpdateAttendanceRequest,
        },
        responses::AttendanceListResponse,
    },
    common::normalize_page,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

const ATTENDANCE_CONFLICT: &str = "Attendance for this date has already been recorded.";

impl SeaOrmStorage {
    /// 在一个事务中写入考勤记录及明细
    pub async fn create_attendance_impl(
        &self,
        taken_by: i64,
        req: CreateAttendanceRequest,
    ) -> Result<AttendanceRecordDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        let date = format_date(req.date);
        let exists = AttendanceRecords::find()
            .filter(Column::Date.eq(date.clone()))
            .one(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询考勤失败: {e}")))?;
        if exists.is_some() {
            return Err(InstituteError::conflict(ATTENDANCE_CONFLICT));
        }

        Self::ensure_students_exist(&txn, &req.entries).await?;

        let now = chrono::Utc::now().timestamp();
        let record = ActiveModel {
            date: Set(date),
            taken_by: Set(Some(taken_by)),
            remarks: Set(req.remarks),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| map_write_err(e, "创建考勤失败", ATTENDANCE_CONFLICT))?;

        for entry in req.entries {
            Self::upsert_entry(&txn, record.id, entry).await?;
        }

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_attendance_by_id_impl(record.id)
            .await?
            .ok_or_else(|| InstituteError::not_found("Attendance record not found after insert."))
    }

    pub async fn get_attendance_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<AttendanceRecordDetail>> {
        let result = AttendanceRecords::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询考勤失败: {e}")))?;

        match result {
            Some(record) => Ok(self.build_record_details(vec![record]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn list_attendance_with_pagination_impl(
        &self,
        query: AttendanceListQuery,
    ) -> Result<AttendanceListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = AttendanceRecords::find();
        if let Some(date) = query.date {
            select = select.filter(Column::Date.eq(format_date(date)));
        }
        select = select.order_by_desc(Column::Date);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询考勤总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询考勤页数失败: {e}"))
        })?;
        let records = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询考勤列表失败: {e}"))
        })?;

        Ok(AttendanceListResponse {
            items: self.build_record_details(records).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新备注，并按 (记录, 学员) 更新或新增明细
    pub async fn update_attendance_impl(
        &self,
        id: i64,
        update: UpdateAttendanceRequest,
    ) -> Result<Option<AttendanceRecordDetail>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        if AttendanceRecords::find_by_id(id)
            .one(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询考勤失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(remarks) = update.remarks {
            model.remarks = Set(remarks);
        }
        model
            .update(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新考勤失败: {e}")))?;

        if let Some(entries) = update.entries {
            Self::ensure_students_exist(&txn, &entries).await?;
            for entry in entries {
                Self::upsert_entry(&txn, id, entry).await?;
            }
        }

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        self.get_attendance_by_id_impl(id).await
    }

    pub async fn delete_attendance_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        AttendanceEntries::delete_many()
            .filter(EntryColumn::RecordId.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除考勤明细失败: {e}")))?;

        let result = AttendanceRecords::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除考勤失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学员自己的出勤历史，日期倒序
    pub async fn list_student_attendance_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<MyAttendanceItem>> {
        let rows = AttendanceEntries::find()
            .filter(EntryColumn::StudentId.eq(student_id))
            .find_also_related(AttendanceRecords)
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询出勤历史失败: {e}")))?;

        let mut items: Vec<MyAttendanceItem> = rows
            .into_iter()
            .filter_map(|(entry, record)| {
                let record = record?.into_record();
                let entry = entry.into_entry();
                Some(MyAttendanceItem {
                    record_id: record.id,
                    date: record.date,
                    status: entry.status,
                    remarks: entry.remarks,
                })
            })
            .collect();
        items.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(items)
    }

    /// 学员出勤统计及各报名进度
    pub async fn get_student_attendance_analytics_impl(
        &self,
        student_id: i64,
    ) -> Result<Option<StudentAttendanceAnalytics>> {
        let briefs = self.load_student_briefs(vec![student_id]).await?;
        let Some(brief) = briefs.get(&student_id) else {
            return Ok(None);
        };

        let statuses: Vec<AttendanceStatus> = AttendanceEntries::find()
            .filter(EntryColumn::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询出勤明细失败: {e}")))?
            .into_iter()
            .map(|m| m.into_entry().status)
            .collect();
        let summary = AttendanceSummary::from_statuses(statuses.iter());

        let enrollments = self.list_student_enrollments(student_id).await?;
        let courses = self
            .load_courses_map(enrollments.iter().map(|e| e.course_id).collect())
            .await?;

        let progress = enrollments
            .into_iter()
            .map(|e| {
                let course = courses.get(&e.course_id);
                let enrollment = e.into_enrollment();
                EnrollmentProgress {
                    enrollment_id: enrollment.id,
                    course_id: enrollment.course_id,
                    course_title: course.map(|c| c.title.clone()).unwrap_or_default(),
                    status: enrollment.status,
                    present_days: summary.present,
                    required_days: course.map(|c| c.required_attendance_days).unwrap_or(0),
                }
            })
            .collect();

        Ok(Some(StudentAttendanceAnalytics {
            student_id,
            student_name: brief.name.clone(),
            reg_no: brief.reg_no.clone(),
            total_days: summary.total(),
            attendance_percentage: summary.percentage(),
            summary,
            enrollments: progress,
        }))
    }

    async fn ensure_students_exist<C: ConnectionTrait>(
        conn: &C,
        entries: &[AttendanceEntryInput],
    ) -> Result<()> {
        let ids: HashSet<i64> = entries.iter().map(|e| e.student_id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let found = Students::find()
            .filter(StudentColumn::Id.is_in(ids.iter().copied()))
            .count(conn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询学员失败: {e}")))?;

        if found as usize != ids.len() {
            return Err(InstituteError::validation(
                "Attendance entries reference an unknown student.",
            ));
        }
        Ok(())
    }

    async fn upsert_entry<C: ConnectionTrait>(
        conn: &C,
        record_id: i64,
        input: AttendanceEntryInput,
    ) -> Result<()> {
        let existing = AttendanceEntries::find()
            .filter(EntryColumn::RecordId.eq(record_id))
            .filter(EntryColumn::StudentId.eq(input.student_id))
            .one(conn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询考勤明细失败: {e}")))?;

        match existing {
            Some(entry) => {
                EntryActiveModel {
                    id: Set(entry.id),
                    status: Set(input.status.as_code().to_string()),
                    remarks: Set(input.remarks),
                    ..Default::default()
                }
                .update(conn)
                .await
                .map_err(|e| {
                    InstituteError::database_operation(format!("更新考勤明细失败: {e}"))
                })?;
            }
            None => {
                EntryActiveModel {
                    record_id: Set(record_id),
                    student_id: Set(input.student_id),
                    status: Set(input.status.as_code().to_string()),
                    remarks: Set(input.remarks),
                    ..Default::default()
                }
                .insert(conn)
                .await
                .map_err(|e| {
                    InstituteError::database_operation(format!("写入考勤明细失败: {e}"))
                })?;
            }
        }
        Ok(())
    }

    async fn build_record_details(
        &self,
        records: Vec<RecordModel>,
    ) -> Result<Vec<AttendanceRecordDetail>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let record_ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let entries = AttendanceEntries::find()
            .filter(EntryColumn::RecordId.is_in(record_ids))
            .order_by_asc(EntryColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询考勤明细失败: {e}")))?;

        let students = self
            .load_student_briefs(entries.iter().map(|e| e.student_id).collect())
            .await?;
        let takers = self
            .load_users_map(records.iter().filter_map(|r| r.taken_by).collect())
            .await?;

        let mut grouped: HashMap<i64, Vec<AttendanceEntryDetail>> = HashMap::new();
        for entry in entries {
            let student = students.get(&entry.student_id);
            grouped
                .entry(entry.record_id)
                .or_default()
                .push(AttendanceEntryDetail {
                    student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                    reg_no: student.and_then(|s| s.reg_no.clone()),
                    entry: entry.into_entry(),
                });
        }

        Ok(records
            .into_iter()
            .map(|r| {
                let entries = grouped.remove(&r.id).unwrap_or_default();
                let summary =
                    AttendanceSummary::from_statuses(entries.iter().map(|e| &e.entry.status));
                let taken_by_name = r
                    .taken_by
                    .and_then(|id| takers.get(&id))
                    .map(|u| u.full_name());
                AttendanceRecordDetail {
                    record: r.into_record(),
                    taken_by_name,
                    total_students: entries.len() as i64,
                    entries,
                    summary,
                }
            })
            .collect())
    }
}
