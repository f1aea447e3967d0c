//! 学员档案实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub user_id: i64,
    #[sea_orm(unique)]
    pub reg_no: Option<String>,
    pub guardian_name: String,
    pub guardian_phone: String,
    pub admission_date: String,
    #[sea_orm(column_type = "Text")]
    pub address: String,
    pub photo: Option<String>,
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::enrollments::Entity")]
    Enrollments,
    #[sea_orm(has_many = "super::fees_receipts::Entity")]
    FeesReceipts,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::enrollments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollments.def()
    }
}

impl Related<super::fees_receipts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FeesReceipts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use super::{parse_date, timestamp_to_datetime};
        use crate::models::students::entities::Student;

        Student {
            id: self.id,
            user_id: self.user_id,
            reg_no: self.reg_no,
            guardian_name: self.guardian_name,
            guardian_phone: self.guardian_phone,
            admission_date: parse_date(&self.admission_date),
            address: self.address,
            photo: self.photo,
            active: self.active,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
