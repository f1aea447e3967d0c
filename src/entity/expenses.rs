//! 支出实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: f64,
    pub added_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AddedBy",
        to = "super::users::Column::Id"
    )]
    AddedBy,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AddedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_expense(self) -> crate::models::finance::entities::Expense {
        use crate::models::finance::entities::{Expense, ExpenseCategory};

        Expense {
            id: self.id,
            date: super::parse_date(&self.date),
            description: self.description,
            category: self
                .category
                .parse::<ExpenseCategory>()
                .unwrap_or(ExpenseCategory::Other),
            amount: self.amount,
            added_by: self.added_by,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
