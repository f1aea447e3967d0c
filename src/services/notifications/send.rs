//! 职员发送通知

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::NotificationService;
use crate::models::notifications::requests::{BroadcastActiveRequest, SendNotificationRequest};
use crate::models::notifications::responses::SendNotificationResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, storage_error_response};
use crate::utils::validate::validate_required;

const TITLE_MAX_CHARS: usize = 120;

fn validate_content(title: &str, message: &str) -> Result<(), &'static str> {
    validate_required(title, "Title is required.")?;
    if title.trim().chars().count() > TITLE_MAX_CHARS {
        return Err("Title must be at most 120 characters.");
    }
    validate_required(message, "Message is required.")
}

pub async fn send_notification(
    service: &NotificationService,
    data: SendNotificationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_content(&data.title, &data.message) {
        return Ok(bad_request(ErrorCode::NotificationInvalid, msg));
    }
    let Some(target) = data.target() else {
        return Ok(bad_request(
            ErrorCode::NotificationInvalid,
            "Select a user, a role or send to all.",
        ));
    };

    let storage = service.get_storage(request);
    match storage
        .send_notifications(target, data.title.trim(), data.message.trim(), data.level)
        .await
    {
        Ok(count) => {
            info!("Notification '{}' sent to {} users", data.title.trim(), count);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                SendNotificationResponse { sent_count: count },
                format!("Notification sent to {count} users"),
            )))
        }
        Err(e) => Ok(storage_error_response(e, ErrorCode::NotificationInvalid)),
    }
}

/// 通知所有在读学员
pub async fn broadcast_active(
    service: &NotificationService,
    data: BroadcastActiveRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Err(msg) = validate_content(&data.title, &data.message) {
        return Ok(bad_request(ErrorCode::NotificationInvalid, msg));
    }

    let storage = service.get_storage(request);
    match storage
        .notify_active_students(data.title.trim(), data.message.trim(), data.level)
        .await
    {
        Ok(count) => Ok(HttpResponse::Created().json(ApiResponse::success(
            SendNotificationResponse { sent_count: count },
            format!("Notification sent to {count} active students"),
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_content() {
        assert!(validate_content("Holiday", "Closed on Friday").is_ok());
        assert!(validate_content("  ", "body").is_err());
        assert!(validate_content("Holiday", "").is_err());
        assert!(validate_content(&"t".repeat(120), "body").is_ok());
        assert!(validate_content(&"t".repeat(121), "body").is_err());
    }
}
