//! 报名存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_write_err};
use crate::entity::attendance_entries::{Column as EntryColumn, Entity as AttendanceEntries};
use crate::entity::batches::Entity as Batches;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::enrollments::{
    ActiveModel, Column, Entity as Enrollments, Model as EnrollmentModel, Relation,
};
use crate::entity::format_date;
use crate::entity::students::{
    Column as StudentColumn, Entity as Students, Relation as StudentRelation,
};
use crate::entity::users::Column as UserColumn;
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    attendance::entities::AttendanceStatus,
    common::normalize_page,
    enrollments::{
        entities::{Enrollment, EnrollmentDetail, EnrollmentStatus},
        requests::{CreateEnrollmentRequest, EnrollmentListQuery, UpdateEnrollmentRequest},
        responses::EnrollmentListResponse,
    },
};
use crate::storage::today;
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use tracing::info;

const ENROLLMENT_CONFLICT: &str = "Student already enrolled in this course.";

impl SeaOrmStorage {
    /// 创建报名：批次归属、容量与重复报名在同一事务内校验
    pub async fn create_enrollment_impl(&self, req: CreateEnrollmentRequest) -> Result<Enrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        let course = Courses::find_by_id(req.course_id)
            .one(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询课程失败: {e}")))?
            .ok_or_else(|| InstituteError::validation("Selected course does not exist."))?;

        if Students::find_by_id(req.student_id)
            .one(&txn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询学员失败: {e}")))?
            .is_none()
        {
            return Err(InstituteError::validation("Selected student does not exist."));
        }

        if let Some(batch_id) = req.batch_id {
            let batch = Batches::find_by_id(batch_id)
                .one(&txn)
                .await
                .map_err(|e| InstituteError::database_operation(format!("查询批次失败: {e}")))?
                .ok_or_else(|| InstituteError::validation("Selected batch does not exist."))?;

            if batch.course_id != course.id {
                return Err(InstituteError::validation(
                    "Selected batch does not belong to the selected course.",
                ));
            }

            let enrolled = Self::count_batch_enrollments(&txn, batch_id).await?;
            if batch.into_batch().is_full(enrolled) {
                return Err(InstituteError::validation("Batch capacity reached."));
            }
        }

        if Self::find_enrollment_in(&txn, req.student_id, req.course_id)
            .await?
            .is_some()
        {
            return Err(InstituteError::validation(ENROLLMENT_CONFLICT));
        }

        let model = ActiveModel {
            student_id: Set(req.student_id),
            course_id: Set(req.course_id),
            batch_id: Set(req.batch_id),
            enrolled_on: Set(format_date(today())),
            completion_date: Set(None),
            status: Set(EnrollmentStatus::Active.to_string()),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| map_write_err(e, "创建报名失败", ENROLLMENT_CONFLICT))?;

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<EnrollmentDetail>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询报名失败: {e}")))?;

        match result {
            Some(model) => Ok(self.build_enrollment_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn find_enrollment_impl(
        &self,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        Ok(Self::find_enrollment_in(&self.db, student_id, course_id)
            .await?
            .map(|m| m.into_enrollment()))
    }

    async fn find_enrollment_in<C: ConnectionTrait>(
        conn: &C,
        student_id: i64,
        course_id: i64,
    ) -> Result<Option<EnrollmentModel>> {
        Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .one(conn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询报名失败: {e}")))
    }

    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Enrollments::find();

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select
                .join(JoinType::InnerJoin, Relation::Student.def())
                .join(JoinType::InnerJoin, StudentRelation::User.def())
                .join(JoinType::InnerJoin, Relation::Course.def())
                .filter(
                    Condition::any()
                        .add(StudentColumn::RegNo.contains(&escaped))
                        .add(UserColumn::FirstName.contains(&escaped))
                        .add(UserColumn::LastName.contains(&escaped))
                        .add(CourseColumn::Code.contains(&escaped))
                        .add(CourseColumn::Title.contains(&escaped)),
                );
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询报名总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询报名页数失败: {e}"))
        })?;
        let enrollments = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询报名列表失败: {e}"))
        })?;

        Ok(EnrollmentListResponse {
            items: self.build_enrollment_details(enrollments).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 更新报名；手动设为 completed 时记录结业日期
    pub async fn update_enrollment_impl(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        let Some(existing) = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询报名失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(batch_id) = update.batch_id {
            let batch = Batches::find_by_id(batch_id)
                .one(&self.db)
                .await
                .map_err(|e| InstituteError::database_operation(format!("查询批次失败: {e}")))?
                .ok_or_else(|| InstituteError::validation("Selected batch does not exist."))?;
            if batch.course_id != existing.course_id {
                return Err(InstituteError::validation(
                    "Selected batch does not belong to the selected course.",
                ));
            }
            model.batch_id = Set(Some(batch_id));
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
            match status {
                EnrollmentStatus::Completed if existing.completion_date.is_none() => {
                    model.completion_date = Set(Some(format_date(today())));
                }
                EnrollmentStatus::Active => model.completion_date = Set(None),
                _ => {}
            }
        }

        if model.is_changed() {
            model
                .update(&self.db)
                .await
                .map_err(|e| InstituteError::database_operation(format!("更新报名失败: {e}")))?;
        }

        self.find_enrollment_impl(existing.student_id, existing.course_id)
            .await
    }

    pub async fn delete_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除报名失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 学员出勤（Present）总天数
    pub async fn count_present_days_impl(&self, student_id: i64) -> Result<i64> {
        let count = AttendanceEntries::find()
            .filter(EntryColumn::StudentId.eq(student_id))
            .filter(EntryColumn::Status.eq(AttendanceStatus::Present.as_code()))
            .count(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("统计出勤天数失败: {e}")))?;

        Ok(count as i64)
    }

    /// 出勤达到课程要求时把 active 报名转为 completed
    pub async fn check_and_update_status_impl(&self, student_id: i64) -> Result<Vec<Enrollment>> {
        let active = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询报名失败: {e}")))?;

        if active.is_empty() {
            return Ok(Vec::new());
        }

        let present_days = self.count_present_days_impl(student_id).await?;
        let courses = self
            .load_courses_map(active.iter().map(|e| e.course_id).collect())
            .await?;

        let mut completed = Vec::new();
        for model in active {
            let Some(course) = courses.get(&model.course_id) else {
                continue;
            };
            let enrollment = model.into_enrollment();
            if !enrollment.should_complete(present_days, course.required_attendance_days) {
                continue;
            }

            let updated = ActiveModel {
                id: Set(enrollment.id),
                status: Set(EnrollmentStatus::Completed.to_string()),
                completion_date: Set(Some(format_date(today()))),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新报名状态失败: {e}")))?;

            info!(
                "报名 {} 已结业（学员 {}，出勤 {}/{} 天）",
                updated.id, student_id, present_days, course.required_attendance_days
            );
            completed.push(updated.into_enrollment());
        }

        Ok(completed)
    }

    /// 学员的全部报名
    pub(crate) async fn list_student_enrollments(
        &self,
        student_id: i64,
    ) -> Result<Vec<EnrollmentModel>> {
        Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::EnrolledOn)
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询报名失败: {e}")))
    }

    async fn build_enrollment_details(
        &self,
        enrollments: Vec<EnrollmentModel>,
    ) -> Result<Vec<EnrollmentDetail>> {
        if enrollments.is_empty() {
            return Ok(Vec::new());
        }

        let students = self
            .load_student_briefs(enrollments.iter().map(|e| e.student_id).collect())
            .await?;
        let courses = self
            .load_courses_map(enrollments.iter().map(|e| e.course_id).collect())
            .await?;
        let batches = self
            .load_batch_codes(enrollments.iter().filter_map(|e| e.batch_id).collect())
            .await?;

        let mut present: HashMap<i64, i64> = HashMap::new();
        for e in &enrollments {
            if !present.contains_key(&e.student_id) {
                let days = self.count_present_days_impl(e.student_id).await?;
                present.insert(e.student_id, days);
            }
        }

        Ok(enrollments
            .into_iter()
            .map(|e| {
                let student = students.get(&e.student_id);
                let course = courses.get(&e.course_id);
                let batch_code = e.batch_id.and_then(|id| batches.get(&id).cloned());
                let present_days = present.get(&e.student_id).copied().unwrap_or(0);
                EnrollmentDetail {
                    student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                    reg_no: student.and_then(|s| s.reg_no.clone()),
                    course_code: course.map(|c| c.code.clone()).unwrap_or_default(),
                    course_title: course.map(|c| c.title.clone()).unwrap_or_default(),
                    required_days: course.map(|c| c.required_attendance_days).unwrap_or(0),
                    batch_code,
                    present_days,
                    enrollment: e.into_enrollment(),
                }
            })
            .collect())
    }
}
