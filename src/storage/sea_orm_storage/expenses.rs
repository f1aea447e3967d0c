//! 支出存储操作

use super::SeaOrmStorage;
use crate::entity::expenses::{ActiveModel, Column, Entity as Expenses};
use crate::entity::format_date;
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    finance::{
        entities::Expense,
        requests::{CreateExpenseRequest, ExpenseListQuery, UpdateExpenseRequest},
        responses::ExpenseListResponse,
    },
};
use crate::storage::today;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_expense_impl(
        &self,
        added_by: i64,
        req: CreateExpenseRequest,
    ) -> Result<Expense> {
        let model = ActiveModel {
            date: Set(format_date(req.date.unwrap_or_else(today))),
            description: Set(req.description.trim().to_string()),
            category: Set(req.category.to_string()),
            amount: Set(req.amount),
            added_by: Set(Some(added_by)),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("创建支出失败: {e}")))?;

        Ok(result.into_expense())
    }

    pub async fn get_expense_by_id_impl(&self, id: i64) -> Result<Option<Expense>> {
        let result = Expenses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询支出失败: {e}")))?;

        Ok(result.map(|m| m.into_expense()))
    }

    pub async fn list_expenses_with_pagination_impl(
        &self,
        query: ExpenseListQuery,
    ) -> Result<ExpenseListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Expenses::find();
        if let Some(category) = query.category {
            select = select.filter(Column::Category.eq(category.to_string()));
        }
        if let Some(from) = query.date_from {
            select = select.filter(Column::Date.gte(format_date(from)));
        }
        if let Some(to) = query.date_to {
            select = select.filter(Column::Date.lte(format_date(to)));
        }
        select = select
            .order_by_desc(Column::Date)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询支出总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询支出页数失败: {e}"))
        })?;
        let expenses = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询支出列表失败: {e}"))
        })?;

        Ok(ExpenseListResponse {
            items: expenses.into_iter().map(|m| m.into_expense()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_expense_impl(
        &self,
        id: i64,
        update: UpdateExpenseRequest,
    ) -> Result<Option<Expense>> {
        let Some(existing) = Expenses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询支出失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(date) = update.date {
            model.date = Set(format_date(date));
        }
        if let Some(description) = update.description {
            model.description = Set(description.trim().to_string());
        }
        if let Some(category) = update.category {
            model.category = Set(category.to_string());
        }
        if let Some(amount) = update.amount {
            model.amount = Set(amount);
        }

        if !model.is_changed() {
            return Ok(Some(existing.into_expense()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新支出失败: {e}")))?;

        Ok(Some(updated.into_expense()))
    }

    pub async fn delete_expense_impl(&self, id: i64) -> Result<bool> {
        let result = Expenses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除支出失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
