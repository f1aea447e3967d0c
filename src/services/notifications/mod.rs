pub mod count;
pub mod list;
pub mod read;
pub mod send;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::notifications::requests::{
    BroadcastActiveRequest, NotificationListParams, SendNotificationRequest,
};

crate::services::lazy_service!(NotificationService);

impl NotificationService {
    pub async fn list_notifications(
        &self,
        query: NotificationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, query, request).await
    }

    pub async fn get_unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        count::get_unread_count(self, request).await
    }

    pub async fn mark_read(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        read::mark_read(self, notification_id, request).await
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        read::mark_all_read(self, request).await
    }

    pub async fn delete_notification(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::delete_notification(self, notification_id, request).await
    }

    pub async fn send_notification(
        &self,
        data: SendNotificationRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        send::send_notification(self, data, request).await
    }

    pub async fn broadcast_active(
        &self,
        data: BroadcastActiveRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        send::broadcast_active(self, data, request).await
    }
}
