//! 讲师实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "trainers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(unique)]
    pub emp_no: String,
    pub join_date: String,
    pub salary: f64,
    pub is_active: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::batches::Entity")]
    Batches,
    #[sea_orm(has_many = "super::payrolls::Entity")]
    Payrolls,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl Related<super::payrolls::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payrolls.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_trainer(self) -> crate::models::courses::entities::Trainer {
        use crate::models::courses::entities::Trainer;

        Trainer {
            id: self.id,
            user_id: self.user_id,
            emp_no: self.emp_no,
            join_date: super::parse_date(&self.join_date),
            salary: self.salary,
            is_active: self.is_active,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
