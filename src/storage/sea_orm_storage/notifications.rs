//! 通知存储操作

use std::collections::BTreeSet;

use super::SeaOrmStorage;
use crate::entity::enrollments::{Column as EnrollmentColumn, Entity as Enrollments};
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    enrollments::entities::EnrollmentStatus,
    notifications::{
        entities::{NotificationLevel, NotificationTarget},
        requests::NotificationListQuery,
        responses::NotificationListResponse,
    },
};
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 按目标解析接收者并批量写入通知，返回写入条数
    pub async fn send_notifications_impl(
        &self,
        target: NotificationTarget,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<i64> {
        let user_ids = match target {
            NotificationTarget::All => self.list_active_user_ids(None).await?,
            NotificationTarget::Role(role) => self.list_active_user_ids(Some(&role)).await?,
            NotificationTarget::User(user_id) => {
                if self.get_user_by_id_impl(user_id).await?.is_none() {
                    return Err(InstituteError::not_found("User not found."));
                }
                vec![user_id]
            }
        };

        self.insert_notifications(user_ids, title, message, level)
            .await
    }

    /// 通知所有有进行中报名的学员
    pub async fn notify_active_students_impl(
        &self,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<i64> {
        let student_ids: Vec<i64> = Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询在读学员失败: {e}")))?;

        if student_ids.is_empty() {
            return Ok(0);
        }

        let user_ids: Vec<i64> = Students::find()
            .select_only()
            .column(StudentColumn::UserId)
            .filter(StudentColumn::Id.is_in(student_ids))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询学员用户失败: {e}")))?;

        self.insert_notifications(user_ids, title, message, level)
            .await
    }

    async fn insert_notifications(
        &self,
        user_ids: Vec<i64>,
        title: &str,
        message: &str,
        level: NotificationLevel,
    ) -> Result<i64> {
        // 去重
        let user_ids: BTreeSet<i64> = user_ids.into_iter().collect();
        if user_ids.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let level = level.to_string();
        let count = user_ids.len() as i64;
        let models = user_ids.into_iter().map(|user_id| ActiveModel {
            user_id: Set(user_id),
            title: Set(title.to_string()),
            message: Set(message.to_string()),
            level: Set(level.clone()),
            is_read: Set(false),
            created_at: Set(now),
            ..Default::default()
        });

        Notifications::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("批量创建通知失败: {e}")))?;

        Ok(count)
    }

    /// 列出用户通知（分页）
    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));

        if let Some(true) = query.unread {
            select = select.filter(Column::IsRead.eq(false));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询通知总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询通知页数失败: {e}")))?;

        let notifications = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询通知列表失败: {e}")))?;

        Ok(NotificationListResponse {
            items: notifications
                .into_iter()
                .map(|m| m.into_notification())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<i64> {
        let count = Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询未读通知数量失败: {e}")))?;

        Ok(count as i64)
    }

    /// 标记通知为已读，只作用于本人的通知
    pub async fn mark_notification_read_impl(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("标记通知已读失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<i64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                InstituteError::database_operation(format!("标记全部通知已读失败: {e}"))
            })?;

        Ok(result.rows_affected as i64)
    }

    pub async fn delete_notification_impl(&self, id: i64, user_id: i64) -> Result<bool> {
        let result = Notifications::delete_many()
            .filter(Column::Id.eq(id))
            .filter(Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除通知失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
