//! 活动存储操作

use super::SeaOrmStorage;
use crate::entity::events::{ActiveModel, Column, Entity as Events};
use crate::entity::{format_date, parse_date};
use crate::errors::{InstituteError, Result};
use crate::models::{
    PaginationInfo,
    common::normalize_page,
    events::{
        entities::{Event, resolve_event_dates},
        requests::{CreateEventRequest, EventListQuery, UpdateEventRequest},
        responses::EventListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_event_impl(&self, created_by: i64, req: CreateEventRequest) -> Result<Event> {
        let (start, end) =
            resolve_event_dates(req.start_date, req.end_date).map_err(InstituteError::validation)?;

        let model = ActiveModel {
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            start_date: Set(format_date(start)),
            end_date: Set(format_date(end)),
            created_by: Set(Some(created_by)),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("创建活动失败: {e}")))?;

        Ok(result.into_event())
    }

    pub async fn get_event_by_id_impl(&self, id: i64) -> Result<Option<Event>> {
        let result = Events::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询活动失败: {e}")))?;

        Ok(result.map(|m| m.into_event()))
    }

    /// 指定 upcoming_from 时只返回未结束的活动，按开始日期正序
    pub async fn list_events_with_pagination_impl(
        &self,
        query: EventListQuery,
    ) -> Result<EventListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Events::find();
        select = match query.upcoming_from {
            Some(from) => select
                .filter(Column::EndDate.gte(format_date(from)))
                .order_by_asc(Column::StartDate)
                .order_by_asc(Column::Id),
            None => select
                .order_by_desc(Column::StartDate)
                .order_by_desc(Column::Id),
        };

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询活动总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询活动页数失败: {e}")))?;
        let events = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询活动列表失败: {e}")))?;

        Ok(EventListResponse {
            items: events.into_iter().map(|m| m.into_event()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_event_impl(
        &self,
        id: i64,
        update: UpdateEventRequest,
    ) -> Result<Option<Event>> {
        let Some(existing) = Events::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("查询活动失败: {e}")))?
        else {
            return Ok(None);
        };

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }

        // 日期按合并后的结果校验
        if update.start_date.is_some() || update.end_date.is_some() {
            let start = match update.start_date {
                Some(start) => start,
                None => parse_date(&existing.start_date),
            };
            let end = match update.end_date {
                Some(end) => end,
                None => parse_date(&existing.end_date),
            };
            let (start, end) =
                resolve_event_dates(start, Some(end)).map_err(InstituteError::validation)?;
            model.start_date = Set(format_date(start));
            model.end_date = Set(format_date(end));
        }

        if !model.is_changed() {
            return Ok(Some(existing.into_event()));
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("更新活动失败: {e}")))?;

        Ok(Some(updated.into_event()))
    }

    pub async fn delete_event_impl(&self, id: i64) -> Result<bool> {
        let result = Events::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| InstituteError::database_operation(format!("删除活动失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 数据库连通性检查
    pub async fn ping_impl(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| InstituteError::database_connection(format!("数据库连接不可用: {e}")))
    }
}
