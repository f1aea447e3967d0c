pub mod handlers;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::events::requests::{CreateEventRequest, EventListParams, UpdateEventRequest};

crate::services::lazy_service!(EventService);

impl EventService {
    pub async fn list_events(
        &self,
        query: EventListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::list_events(self, query, request).await
    }

    pub async fn get_event(&self, event_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        handlers::get_event(self, event_id, request).await
    }

    pub async fn create_event(
        &self,
        data: CreateEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::create_event(self, data, request).await
    }

    pub async fn update_event(
        &self,
        event_id: i64,
        data: UpdateEventRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::update_event(self, event_id, data, request).await
    }

    pub async fn delete_event(
        &self,
        event_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        handlers::delete_event(self, event_id, request).await
    }
}
