//! 课程存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

const COURSE_CONFLICT: &str = "A course with this code already exists.";

impl SeaOrmStorage {
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code.trim().to_string()),
            title: Set(req.title.trim().to_string()),
            duration_weeks: Set(req.duration_weeks),
            total_fees: Set(req.total_fees),
            syllabus: Set(req.syllabus),
            active: Set(req.active),
            required_attendance_days: Set(req.required_attendance_days),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "创建课程失败", COURSE_CONFLICT))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Courses::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Code.contains(&escaped))
                    .add(Column::Title.contains(&escaped)),
            );
        }

        if let Some(active) = query.active {
            select = select.filter(Column::Active.eq(active));
        }

        select = select.order_by_asc(Column::Title);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询课程总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询课程页数失败: {e}"))
        })?;
        let courses = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询课程列表失败: {e}"))
        })?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(code) = update.code {
            model.code = Set(code.trim().to_string());
        }
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(duration_weeks) = update.duration_weeks {
            model.duration_weeks = Set(duration_weeks);
        }
        if let Some(total_fees) = update.total_fees {
            model.total_fees = Set(total_fees);
        }
        if let Some(syllabus) = update.syllabus {
            model.syllabus = Set(syllabus);
        }
        if let Some(active) = update.active {
            model.active = Set(active);
        }
        if let Some(days) = update.required_attendance_days {
            model.required_attendance_days = Set(days);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| map_write_err(e, "更新课程失败", COURSE_CONFLICT))?;

        self.get_course_by_id_impl(id).await
    }

    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除课程失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量加载课程，返回 id -> Course
    pub(crate) async fn load_courses_map(
        &self,
        ids: Vec<i64>,
    ) -> Result<std::collections::HashMap<i64, Course>> {
        if ids.is_empty() {
            return Ok(Default::default());
        }

        let courses = Courses::find()
            .filter(Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("批量查询课程失败: {e}")))?;

        Ok(courses.into_iter().map(|m| (m.id, m.into_course())).collect())
    }
}
