//! 批次存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_write_err};
use crate::entity::batches::{ActiveModel, Column, Entity as Batches, Model as BatchModel};
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::trainers::{Column as TrainerColumn, Entity as Trainers};
use crate::entity::users::Entity as Users;
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    courses::{
        entities::BatchDetail,
        requests::{BatchListQuery, CreateBatchRequest, UpdateBatchRequest},
        responses::BatchListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

const BATCH_CONFLICT: &str = "A batch with this code already exists.";

impl SeaOrmStorage {
    pub async fn create_batch_impl(&self, req: CreateBatchRequest) -> Result<BatchDetail> {
        let model = ActiveModel {
            course_id: Set(req.course_id),
            trainer_id: Set(req.trainer_id),
            code: Set(req.code.trim().to_string()),
            capacity: Set(req.capacity),
            schedule: Set(req.schedule),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "创建批次失败", BATCH_CONFLICT))?;

        let mut details = self.build_batch_details(vec![result]).await?;
        details
            .pop()
            .ok_or_else(|| InstituteError::not_found("Batch not found after insert."))
    }

    pub async fn get_batch_by_id_impl(&self, id: i64) -> Result<Option<BatchDetail>> {
        let result = Batches::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询批次失败: {e}")))?;

        match result {
            Some(batch) => Ok(self.build_batch_details(vec![batch]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn list_batches_with_pagination_impl(
        &self,
        query: BatchListQuery,
    ) -> Result<BatchListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Batches::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Code.contains(escape_like_pattern(search.trim())));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询批次总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询批次页数失败: {e}"))
        })?;
        let batches = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询批次列表失败: {e}"))
        })?;

        Ok(BatchListResponse {
            items: self.build_batch_details(batches).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_batch_impl(
        &self,
        id: i64,
        update: UpdateBatchRequest,
    ) -> Result<Option<BatchDetail>> {
        if self.get_batch_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(trainer_id) = update.trainer_id {
            model.trainer_id = Set(Some(trainer_id));
        }
        if let Some(code) = update.code {
            model.code = Set(code.trim().to_string());
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(capacity);
        }
        if let Some(schedule) = update.schedule {
            model.schedule = Set(schedule);
        }

        if model.is_changed() {
            model
                .update(&self.db)
                .await
                .map_err(|e| map_write_err(e, "更新批次失败", BATCH_CONFLICT))?;
        }

        self.get_batch_by_id_impl(id).await
    }

    pub async fn delete_batch_impl(&self, id: i64) -> Result<bool> {
        let result = Batches::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除批次失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批次内的报名人数
    pub(crate) async fn count_batch_enrollments<C: ConnectionTrait>(
        conn: &C,
        batch_id: i64,
    ) -> Result<i64> {
        let count = Enrollments::find()
            .filter(EnrollmentColumn::BatchId.eq(batch_id))
            .count(conn)
            .await
            .map_err(|e| InstituteError::database_operation(format!("统计批次人数失败: {e}")))?;

        Ok(count as i64)
    }

    /// 批量加载批次编号，返回 id -> code
    pub(crate) async fn load_batch_codes(&self, ids: Vec<i64>) -> Result<HashMap<i64, String>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Batches::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Code)
            .filter(Column::Id.is_in(ids))
            .into_tuple::<(i64, String)>()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("批量查询批次失败: {e}")))?;

        Ok(rows.into_iter().collect())
    }

    async fn build_batch_details(&self, batches: Vec<BatchModel>) -> Result<Vec<BatchDetail>> {
        if batches.is_empty() {
            return Ok(Vec::new());
        }

        let batch_ids: Vec<i64> = batches.iter().map(|b| b.id).collect();
        let course_ids: Vec<i64> = batches.iter().map(|b| b.course_id).collect();
        let trainer_ids: Vec<i64> = batches.iter().filter_map(|b| b.trainer_id).collect();

        let courses = self.load_courses_map(course_ids).await?;

        // 讲师姓名
        let mut trainer_names: HashMap<i64, String> = HashMap::new();
        if !trainer_ids.is_empty() {
            let trainers = Trainers::find()
                .filter(TrainerColumn::Id.is_in(trainer_ids))
                .find_also_related(Users)
                .all(&self.db)
                .await
                .map_err(|e| {
                    InstituteError::database_operation(format!("查询讲师失败: {e}"))
                })?;
            for (trainer, user) in trainers {
                if let Some(user) = user {
                    trainer_names.insert(trainer.id, user.into_user().full_name());
                }
            }
        }

        // 各批次报名人数
        let counts: HashMap<i64, i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::BatchId)
            .column_as(EnrollmentColumn::Id.count(), "enrolled")
            .filter(EnrollmentColumn::BatchId.is_in(batch_ids))
            .group_by(EnrollmentColumn::BatchId)
            .into_tuple::<(Option<i64>, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("统计批次人数失败: {e}")))?
            .into_iter()
            .filter_map(|(batch_id, count)| batch_id.map(|id| (id, count)))
            .collect();

        Ok(batches
            .into_iter()
            .map(|b| {
                let enrolled_count = counts.get(&b.id).copied().unwrap_or(0);
                let course_title = courses
                    .get(&b.course_id)
                    .map(|c| c.title.clone())
                    .unwrap_or_default();
                let trainer_name = b.trainer_id.and_then(|id| trainer_names.get(&id).cloned());
                let batch = b.into_batch();
                BatchDetail {
                    is_full: batch.is_full(enrolled_count),
                    batch,
                    course_title,
                    trainer_name,
                    enrolled_count,
                }
            })
            .collect())
    }
}
