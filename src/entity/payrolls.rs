//! 工资发放实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payrolls")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub trainer_id: i64,
    pub month: String,
    pub amount: f64,
    pub paid_on: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub remarks: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::trainers::Entity",
        from = "Column::TrainerId",
        to = "super::trainers::Column::Id"
    )]
    Trainer,
}

impl Related<super::trainers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trainer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payroll(self) -> crate::models::finance::entities::Payroll {
        use crate::models::finance::entities::Payroll;

        Payroll {
            id: self.id,
            trainer_id: self.trainer_id,
            month: self.month,
            amount: self.amount,
            paid_on: self.paid_on.as_deref().map(super::parse_date),
            remarks: self.remarks,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
