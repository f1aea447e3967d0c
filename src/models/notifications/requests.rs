use serde::Deserialize;
use ts_rs::TS;

use super::entities::{NotificationLevel, NotificationTarget};
use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_bool;
use crate::models::users::entities::UserRole;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct NotificationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub unread: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub unread: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct SendNotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub level: NotificationLevel,
    pub user_id: Option<i64>,
    pub role: Option<UserRole>,
    #[serde(default)]
    pub send_to_all: bool,
}

impl SendNotificationRequest {
    /// 优先级：全体 > 角色 > 单个用户
    pub fn target(&self) -> Option<NotificationTarget> {
        if self.send_to_all {
            Some(NotificationTarget::All)
        } else if let Some(role) = &self.role {
            Some(NotificationTarget::Role(role.clone()))
        } else {
            self.user_id.map(NotificationTarget::User)
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "notification.ts")]
pub struct BroadcastActiveRequest {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub level: NotificationLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> SendNotificationRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_target_resolution() {
        let r = request(r#"{"title":"t","message":"m","user_id":3}"#);
        assert_eq!(r.target(), Some(NotificationTarget::User(3)));
        assert_eq!(r.level, NotificationLevel::Info);

        let r = request(r#"{"title":"t","message":"m","user_id":3,"role":"staff"}"#);
        assert_eq!(r.target(), Some(NotificationTarget::Role(UserRole::Staff)));

        let r = request(r#"{"title":"t","message":"m","role":"student","send_to_all":true}"#);
        assert_eq!(r.target(), Some(NotificationTarget::All));
    }

    #[test]
    fn test_target_missing() {
        let r = request(r#"{"title":"t","message":"m","level":"warning"}"#);
        assert_eq!(r.target(), None);
        assert_eq!(r.level, NotificationLevel::Warning);
    }
}
