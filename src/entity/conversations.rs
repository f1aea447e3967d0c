//! 会话实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub student_id: i64,
    pub created_at: i64,
    pub last_message_at: i64,
    pub student_read: bool,
    pub admin_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::messages::Entity")]
    Messages,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Messages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_conversation(self) -> crate::models::messaging::entities::Conversation {
        use super::timestamp_to_datetime;
        use crate::models::messaging::entities::Conversation;

        Conversation {
            id: self.id,
            student_id: self.student_id,
            created_at: timestamp_to_datetime(self.created_at),
            last_message_at: timestamp_to_datetime(self.last_message_at),
            student_read: self.student_read,
            admin_read: self.admin_read,
        }
    }
}
