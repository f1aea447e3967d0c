use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "messaging.ts")]
pub struct SendMessageRequest {
    pub body: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "messaging.ts")]
pub struct ConversationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    /// 学员只能看到自己的会话
    pub student_id: Option<i64>,
    pub search: Option<String>,
}
