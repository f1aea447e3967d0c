//! 讲师存储操作

use super::{SeaOrmStorage, map_write_err};
use crate::entity::format_date;
use crate::entity::trainers::{ActiveModel, Column, Entity as Trainers};
use crate::entity::users::Entity as Users;
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    courses::{
        entities::TrainerDetail,
        requests::{CreateTrainerRequest, TrainerListQuery, UpdateTrainerRequest},
        responses::TrainerListResponse,
    },
};
use crate::storage::today;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

const TRAINER_CONFLICT: &str = "Trainer profile or employee number already exists.";

impl SeaOrmStorage {
    pub async fn create_trainer_impl(&self, req: CreateTrainerRequest) -> Result<TrainerDetail> {
        let model = ActiveModel {
            user_id: Set(req.user_id),
            emp_no: Set(req.emp_no.trim().to_string()),
            join_date: Set(format_date(req.join_date.unwrap_or_else(today))),
            salary: Set(req.salary),
            is_active: Set(req.is_active),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "创建讲师失败", TRAINER_CONFLICT))?;

        self.get_trainer_by_id_impl(result.id)
            .await?
            .ok_or_else(|| InstituteError::not_found("Trainer not found after insert."))
    }

    pub async fn get_trainer_by_id_impl(&self, id: i64) -> Result<Option<TrainerDetail>> {
        let result = Trainers::find_by_id(id)
            .find_also_related(Users)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询讲师失败: {e}")))?;

        Ok(result.and_then(|(trainer, user)| {
            user.map(|u| TrainerDetail {
                trainer: trainer.into_trainer(),
                user: u.into_user(),
            })
        }))
    }

    pub async fn list_trainers_with_pagination_impl(
        &self,
        query: TrainerListQuery,
    ) -> Result<TrainerListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Trainers::find();
        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }
        select = select.order_by_asc(Column::EmpNo);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询讲师总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询讲师页数失败: {e}"))
        })?;
        let trainers = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询讲师列表失败: {e}"))
        })?;

        let mut users = self
            .load_users_map(trainers.iter().map(|t| t.user_id).collect())
            .await?;

        let items = trainers
            .into_iter()
            .filter_map(|t| {
                let user = users.remove(&t.user_id)?;
                Some(TrainerDetail {
                    trainer: t.into_trainer(),
                    user,
                })
            })
            .collect();

        Ok(TrainerListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_trainer_impl(
        &self,
        id: i64,
        update: UpdateTrainerRequest,
    ) -> Result<Option<TrainerDetail>> {
        if self.get_trainer_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(emp_no) = update.emp_no {
            model.emp_no = Set(emp_no.trim().to_string());
        }
        if let Some(join_date) = update.join_date {
            model.join_date = Set(format_date(join_date));
        }
        if let Some(salary) = update.salary {
            model.salary = Set(salary);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        if model.is_changed() {
            model
                .update(&self.db)
                .await
                .map_err(|e| map_write_err(e, "更新讲师失败", TRAINER_CONFLICT))?;
        }

        self.get_trainer_by_id_impl(id).await
    }

    pub async fn delete_trainer_impl(&self, id: i64) -> Result<bool> {
        let result = Trainers::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除讲师失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
