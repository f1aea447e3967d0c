//! 收费收据实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fees_receipts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub receipt_no: String,
    #[sea_orm(unique)]
    pub public_id: String,
    pub student_id: i64,
    pub course_id: Option<i64>,
    pub batch_id: Option<i64>,
    pub amount: f64,
    pub mode: String,
    pub txn_id: String,
    pub date: String,
    pub posted_by: Option<i64>,
    pub locked: bool,
    pub pdf_path: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::courses::Entity",
        from = "Column::CourseId",
        to = "super::courses::Column::Id"
    )]
    Course,
    #[sea_orm(
        belongs_to = "super::batches::Entity",
        from = "Column::BatchId",
        to = "super::batches::Column::Id"
    )]
    Batch,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::courses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_receipt(self) -> crate::models::finance::entities::FeesReceipt {
        use crate::models::finance::entities::{FeesReceipt, PaymentMode};

        FeesReceipt {
            id: self.id,
            receipt_no: self.receipt_no,
            public_id: self.public_id,
            student_id: self.student_id,
            course_id: self.course_id,
            batch_id: self.batch_id,
            amount: self.amount,
            mode: self.mode.parse::<PaymentMode>().unwrap_or(PaymentMode::Cash),
            txn_id: self.txn_id,
            date: super::parse_date(&self.date),
            posted_by: self.posted_by,
            locked: self.locked,
            pdf_path: self.pdf_path,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
