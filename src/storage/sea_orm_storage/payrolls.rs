//! 工资发放存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, map_write_err};
use crate::entity::format_date;
use crate::entity::payrolls::{ActiveModel, Column, Entity as Payrolls, Model as PayrollModel};
use crate::entity::trainers::{Column as TrainerColumn, Entity as Trainers};
use crate::entity::users::Entity as Users;
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    finance::{
        entities::PayrollDetail,
        requests::{CreatePayrollRequest, PayrollListQuery, UpdatePayrollRequest},
        responses::PayrollListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

const PAYROLL_CONFLICT: &str = "Payroll for this trainer and month already exists.";

impl SeaOrmStorage {
    pub async fn create_payroll_impl(&self, req: CreatePayrollRequest) -> Result<PayrollDetail> {
        let model = ActiveModel {
            trainer_id: Set(req.trainer_id),
            month: Set(req.month.trim().to_string()),
            amount: Set(req.amount),
            paid_on: Set(req.paid_on.map(format_date)),
            remarks: Set(req.remarks),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "创建工资记录失败", PAYROLL_CONFLICT))?;

        self.build_payroll_details(vec![result])
            .await?
            .pop()
            .ok_or_else(|| InstituteError::not_found("Payroll not found after insert."))
    }

    pub async fn get_payroll_by_id_impl(&self, id: i64) -> Result<Option<PayrollDetail>> {
        let result = Payrolls::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询工资记录失败: {e}")))?;

        match result {
            Some(model) => Ok(self.build_payroll_details(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn list_payrolls_with_pagination_impl(
        &self,
        query: PayrollListQuery,
    ) -> Result<PayrollListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Payrolls::find();
        if let Some(trainer_id) = query.trainer_id {
            select = select.filter(Column::TrainerId.eq(trainer_id));
        }
        if let Some(ref month) = query.month
            && !month.trim().is_empty()
        {
            select = select.filter(Column::Month.eq(month.trim()));
        }
        select = select
            .order_by_desc(Column::Month)
            .order_by_asc(Column::TrainerId);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询工资记录总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询工资记录页数失败: {e}"))
        })?;
        let payrolls = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询工资记录列表失败: {e}"))
        })?;

        Ok(PayrollListResponse {
            items: self.build_payroll_details(payrolls).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_payroll_impl(
        &self,
        id: i64,
        update: UpdatePayrollRequest,
    ) -> Result<Option<PayrollDetail>> {
        if Payrolls::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询工资记录失败: {e}")))?
            .is_none()
        {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(month) = update.month {
            model.month = Set(month.trim().to_string());
        }
        if let Some(amount) = update.amount {
            model.amount = Set(amount);
        }
        if let Some(paid_on) = update.paid_on {
            model.paid_on = Set(Some(format_date(paid_on)));
        }
        if let Some(remarks) = update.remarks {
            model.remarks = Set(remarks);
        }

        if model.is_changed() {
            model
                .update(&self.db)
                .await
                .map_err(|e| map_write_err(e, "更新工资记录失败", PAYROLL_CONFLICT))?;
        }

        self.get_payroll_by_id_impl(id).await
    }

    pub async fn delete_payroll_impl(&self, id: i64) -> Result<bool> {
        let result = Payrolls::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除工资记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    async fn build_payroll_details(
        &self,
        payrolls: Vec<PayrollModel>,
    ) -> Result<Vec<PayrollDetail>> {
        if payrolls.is_empty() {
            return Ok(Vec::new());
        }

        let trainer_ids: Vec<i64> = payrolls.iter().map(|p| p.trainer_id).collect();
        let trainers = Trainers::find()
            .filter(TrainerColumn::Id.is_in(trainer_ids))
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询讲师失败: {e}")))?;

        let trainers: HashMap<i64, (String, String)> = trainers
            .into_iter()
            .map(|(t, u)| {
                let name = u.map(|u| u.into_user().full_name()).unwrap_or_default();
                (t.id, (name, t.emp_no))
            })
            .collect();

        Ok(payrolls
            .into_iter()
            .map(|p| {
                let (trainer_name, emp_no) =
                    trainers.get(&p.trainer_id).cloned().unwrap_or_default();
                PayrollDetail {
                    payroll: p.into_payroll(),
                    trainer_name,
                    emp_no,
                }
            })
            .collect())
    }
}
