use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MessagingService;
use crate::models::messaging::requests::{ConversationListParams, ConversationListQuery};
use crate::models::messaging::responses::ConversationThreadResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{Caller, require_student, resolve_caller, storage_error_response};

/// 职员看到全部会话，学员只看到自己的
pub async fn list_conversations(
    service: &MessagingService,
    query: ConversationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let caller = match resolve_caller(&storage, request).await {
        Ok(caller) => caller,
        Err(resp) => return Ok(resp),
    };

    let student_id = match caller {
        Caller::Staff(_) => None,
        Caller::Student(_, student) => Some(student.id),
        Caller::Other(_) => Some(-1),
    };

    let list_query = ConversationListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        student_id,
        search: query.search,
    };

    match storage.list_conversations_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Conversation list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}

/// 学员自己的会话，不存在时创建，并标记学员侧已读
pub async fn my_conversation(
    service: &MessagingService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (_, student) = match require_student(&storage, request).await {
        Ok(pair) => pair,
        Err(resp) => return Ok(resp),
    };

    let mut conversation = match storage.get_or_create_conversation(student.id).await {
        Ok(conversation) => conversation,
        Err(e) => return Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    };

    if let Err(e) = storage.mark_conversation_read(conversation.id, false).await {
        return Ok(storage_error_response(e, ErrorCode::InternalServerError));
    }
    conversation.student_read = true;

    match storage.list_messages(conversation.id).await {
        Ok(messages) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ConversationThreadResponse {
                conversation,
                messages,
            },
            "Conversation retrieved successfully",
        ))),
        Err(e) => Ok(storage_error_response(e, ErrorCode::InternalServerError)),
    }
}
