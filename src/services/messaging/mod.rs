pub mod conversations;
pub mod messages;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::messaging::requests::{ConversationListParams, SendMessageRequest};

crate::services::lazy_service!(MessagingService);

impl MessagingService {
    pub async fn list_conversations(
        &self,
        query: ConversationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        conversations::list_conversations(self, query, request).await
    }

    pub async fn my_conversation(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        conversations::my_conversation(self, request).await
    }

    pub async fn list_messages(
        &self,
        conversation_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::list_messages(self, conversation_id, request).await
    }

    pub async fn send_message(
        &self,
        conversation_id: i64,
        data: SendMessageRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::send_message(self, conversation_id, data, request).await
    }
}
