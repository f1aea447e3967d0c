//! 考勤记录实体（每天一条）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub date: String,
    pub taken_by: Option<i64>,
    #[sea_orm(column_type = "Text")]
    pub remarks: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_entries::Entity")]
    Entries,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::TakenBy",
        to = "super::users::Column::Id"
    )]
    TakenBy,
}

impl Related<super::attendance_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TakenBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_record(self) -> crate::models::attendance::entities::AttendanceRecord {
        use super::{parse_date, timestamp_to_datetime};
        use crate::models::attendance::entities::AttendanceRecord;

        AttendanceRecord {
            id: self.id,
            date: parse_date(&self.date),
            taken_by: self.taken_by,
            remarks: self.remarks,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
