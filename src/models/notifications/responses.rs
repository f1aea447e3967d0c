use serde::Serialize;
use ts_rs::TS;

use super::entities::Notification;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct NotificationListResponse {
    pub items: Vec<Notification>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct UnreadCountResponse {
    pub unread_count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct MarkAllReadResponse {
    pub marked_count: i64,
}

/// 批量发送结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct SendNotificationResponse {
    pub sent_count: i64,
}
