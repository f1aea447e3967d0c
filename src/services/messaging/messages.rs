//! 会话内消息
//!
//! 会话不存在或不属于调用方时一律返回 404。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::MessagingService;
use crate::models::messaging::entities::Conversation;
use crate::models::messaging::requests::SendMessageRequest;
use crate::models::messaging::responses::ConversationThreadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    Caller, bad_request, not_found, resolve_caller, storage_error_response,
};
use crate::storage::Storage;

async fn accessible_conversation(
    storage: &Arc<dyn Storage>,
    caller: &Caller,
    conversation_id: i64,
) -> Result<Conversation, HttpResponse> {
    match storage.get_conversation_by_id(conversation_id).await {
        Ok(Some(conversation)) if caller.can_access_student(conversation.student_id) => {
            Ok(conversation)
        }
        Ok(_) => Err(not_found(
            ErrorCode::ConversationNotFound,
            "Conversation not found.",
        )),
        Err(e) => Err(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn list_messages(
    service: &MessagingService,
    conversation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };
    let mut conversation = match accessible_conversation(&storage, &caller, conversation_id).await
    {
        Ok(conversation) => conversation,
        Err(resp) => return Ok(resp),
    };

    let by_staff = caller.is_staff();
    if let Err(e) = storage.mark_conversation_read(conversation.id, by_staff).await {
        return Ok(storage_error_response(e, ErrorCode::InternalServerError));
    }
    if by_staff {
        conversation.admin_read = true;
    } else {
        conversation.student_read = true;
    }

    match storage.list_messages(conversation.id).await {
        Ok(messages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ConversationThreadResponse {
                conversation,
                messages,
            },
            "Messages retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

pub async fn send_message(
    service: &MessagingService,
    conversation_id: i64,
    data: SendMessageRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let body = data.body.trim();
    if body.is_empty() {
        return Ok(bad_request(
            ErrorCode::MessageInvalid,
            "Message body cannot be empty.",
        ));
    }

    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };
    let conversation = match accessible_conversation(&storage, &caller, conversation_id).await {
        Ok(conversation) => conversation,
        Err(resp) => return Ok(resp),
    };

    match storage
        .create_message(conversation.id, caller.user().id, caller.is_staff(), body)
        .await
    {
        Ok(message) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(message, "Message sent successfully"))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::MessageInvalid)),
    }
}
