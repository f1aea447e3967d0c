//! 结业证书实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub certificate_no: String,
    pub student_id: i64,
    pub course_id: i64,
    pub issue_date: String,
    #[sea_orm(unique)]
    pub qr_hash: String,
    #[sea_orm(column_type = "Text")]
    pub remarks: String,
    pub revoked: bool,
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

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_certificate(self) -> crate::models::certificates::entities::Certificate {
        use crate::models::certificates::entities::Certificate;

        Certificate {
            id: self.id,
            certificate_no: self.certificate_no,
            student_id: self.student_id,
            course_id: self.course_id,
            issue_date: super::parse_date(&self.issue_date),
            qr_hash: self.qr_hash,
            remarks: self.remarks,
            revoked: self.revoked,
            pdf_path: self.pdf_path,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
