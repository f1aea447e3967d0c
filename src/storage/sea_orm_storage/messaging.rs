//! 会话与消息存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::conversations::{ActiveModel, Column, Entity as Conversations, Relation};
use crate::entity::messages::{
    ActiveModel as MessageActiveModel, Column as MessageColumn, Entity as Messages,
};
use crate::entity::students::{Column as StudentColumn, Relation as StudentRelation};
use crate::entity::users::Column as UserColumn;
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    messaging::{
        entities::{
            Conversation, ConversationSummary, Message, MessageDetail, preview,
            read_flags_after_send,
        },
        requests::ConversationListQuery,
        responses::ConversationListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 分页列出会话（最近消息在前），附带最后一条消息预览
    pub async fn list_conversations_with_pagination_impl(
        &self,
        query: ConversationListQuery,
    ) -> Result<ConversationListResponse> {
        let (page, size) = normalize_page(query.page, query.size);
        let viewer_is_staff = query.student_id.is_none();

        let mut select = Conversations::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select
                .join(JoinType::InnerJoin, Relation::Student.def())
                .join(JoinType::InnerJoin, StudentRelation::User.def())
                .filter(
                    Condition::any()
                        .add(StudentColumn::RegNo.contains(&escaped))
                        .add(UserColumn::FirstName.contains(&escaped))
                        .add(UserColumn::LastName.contains(&escaped)),
                );
        }
        select = select.order_by_desc(Column::LastMessageAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            InstituteError::database_operation(format!("查询会话总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            InstituteError::database_operation(format!("查询会话页数失败: {e}"))
        })?;
        let conversations = paginator.fetch_page(page - 1).await.map_err(|e| {
            InstituteError::database_operation(format!("查询会话列表失败: {e}"))
        })?;

        let students = self
            .load_student_briefs(conversations.iter().map(|c| c.student_id).collect())
            .await?;

        // 每个会话的最后一条消息
        let mut last_messages: HashMap<i64, String> = HashMap::new();
        for conversation in &conversations {
            let last = Messages::find()
                .select_only()
                .column(MessageColumn::Body)
                .filter(MessageColumn::ConversationId.eq(conversation.id))
                .order_by_desc(MessageColumn::SentAt)
                .order_by_desc(MessageColumn::Id)
                .into_tuple::<String>()
                .one(&self.db)
                .await
                .map_err(|e| {
                    InstituteError::database_operation(format!("查询最后消息失败: {e}"))
                })?;
            if let Some(body) = last {
                last_messages.insert(conversation.id, preview(&body));
            }
        }

        let items = conversations
            .into_iter()
            .map(|c| {
                let student = students.get(&c.student_id);
                let last_message = last_messages.remove(&c.id);
                let conversation = c.into_conversation();
                ConversationSummary {
                    student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                    reg_no: student.and_then(|s| s.reg_no.clone()),
                    unread: conversation.is_unread_for(viewer_is_staff),
                    last_message,
                    conversation,
                }
            })
            .collect();

        Ok(ConversationListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn get_conversation_by_id_impl(&self, id: i64) -> Result<Option<Conversation>> {
        let result = Conversations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询会话失败: {e}")))?;

        Ok(result.map(|m| m.into_conversation()))
    }

    /// 获取学员的会话，不存在时创建
    pub async fn get_or_create_conversation_impl(&self, student_id: i64) -> Result<Conversation> {
        let existing = Conversations::find()
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询会话失败: {e}")))?;
        if let Some(conversation) = existing {
            return Ok(conversation.into_conversation());
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            student_id: Set(student_id),
            created_at: Set(now),
            last_message_at: Set(now),
            student_read: Set(true),
            admin_read: Set(true),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(created) => Ok(created.into_conversation()),
            // 并发创建时唯一约束冲突，读回已存在的会话
            Err(e) => Conversations::find()
                .filter(Column::StudentId.eq(student_id))
                .one(&self.db)
                .await
                .map_err(|e| InstituteError::database_operation(format!("查询会话失败: {e}")))?
                .map(|m| m.into_conversation())
                .ok_or_else(|| InstituteError::database_operation(format!("创建会话失败: {e}"))),
        }
    }

    /// 会话消息，时间正序
    pub async fn list_messages_impl(&self, conversation_id: i64) -> Result<Vec<MessageDetail>> {
        let messages = Messages::find()
            .filter(MessageColumn::ConversationId.eq(conversation_id))
            .order_by_asc(MessageColumn::SentAt)
            .order_by_asc(MessageColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询消息失败: {e}")))?;

        let senders = self
            .load_users_map(messages.iter().filter_map(|m| m.sender_id).collect())
            .await?;

        Ok(messages
            .into_iter()
            .map(|m| {
                let sender = m.sender_id.and_then(|id| senders.get(&id));
                MessageDetail {
                    sender_name: sender.map(|u| u.full_name()),
                    is_staff_sender: sender.is_some_and(|u| u.is_staff()),
                    message: m.into_message(),
                }
            })
            .collect())
    }

    /// 标记调用方一侧已读
    pub async fn mark_conversation_read_impl(
        &self,
        conversation_id: i64,
        by_staff: bool,
    ) -> Result<bool> {
        let column = if by_staff {
            Column::AdminRead
        } else {
            Column::StudentRead
        };

        let result = Conversations::update_many()
            .col_expr(column, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(conversation_id))
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新已读状态失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 写入消息并更新会话的最后消息时间与已读标记
    pub async fn create_message_impl(
        &self,
        conversation_id: i64,
        sender_id: i64,
        sender_is_staff: bool,
        body: &str,
    ) -> Result<Message> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| InstituteError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let message = MessageActiveModel {
            conversation_id: Set(conversation_id),
            sender_id: Set(Some(sender_id)),
            body: Set(body.to_string()),
            sent_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| InstituteError::database_operation(format!("发送消息失败: {e}")))?;

        let (student_read, admin_read) = read_flags_after_send(sender_is_staff);
        ActiveModel {
            id: Set(conversation_id),
            last_message_at: Set(now),
            student_read: Set(student_read),
            admin_read: Set(admin_read),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| InstituteError::database_operation(format!("更新会话失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| InstituteError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(message.into_message())
    }
}
