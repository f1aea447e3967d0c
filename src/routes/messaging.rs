use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::messaging::requests::{ConversationListParams, SendMessageRequest};
use crate::services::MessagingService;
use crate::utils::SafeIDI64;

// 懒加载的全局 MessagingService 实例
static MESSAGING_SERVICE: Lazy<MessagingService> = Lazy::new(MessagingService::new_lazy);

pub async fn list_conversations(
    req: HttpRequest,
    query: web::Query<ConversationListParams>,
) -> ActixResult<HttpResponse> {
    MESSAGING_SERVICE
        .list_conversations(query.into_inner(), &req)
        .await
}

pub async fn my_conversation(req: HttpRequest) -> ActixResult<HttpResponse> {
    MESSAGING_SERVICE.my_conversation(&req).await
}

pub async fn list_messages(
    req: HttpRequest,
    conversation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    MESSAGING_SERVICE.list_messages(conversation_id.0, &req).await
}

pub async fn send_message(
    req: HttpRequest,
    conversation_id: SafeIDI64,
    data: web::Json<SendMessageRequest>,
) -> ActixResult<HttpResponse> {
    MESSAGING_SERVICE
        .send_message(conversation_id.0, data.into_inner(), &req)
        .await
}

// 配置路由，权限在服务内按会话归属判断
pub fn configure_messaging_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/conversations")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_conversations))
            .route("/my", web::get().to(my_conversation))
            .route("/{id}/messages", web::get().to(list_messages))
            .route("/{id}/messages", web::post().to(send_message)),
    );
}
